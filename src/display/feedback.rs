//! Validation bar and reconciliation results

use crate::models::Percent;
use crate::reconcile::{BudgetFeedback, BudgetStatus, Reconciliation};

const BAR_WIDTH: i64 = 30;

fn usage_bar(usage: Percent) -> String {
    let filled = (usage.hundredths() * BAR_WIDTH / Percent::HUNDRED.hundredths()).clamp(0, BAR_WIDTH);
    format!(
        "[{}{}]",
        "#".repeat(filled as usize),
        "-".repeat((BAR_WIDTH - filled) as usize)
    )
}

/// Format live feedback for a set of edits
pub fn format_feedback(feedback: &BudgetFeedback, symbol: &str) -> String {
    let mut output = format!(
        "{} {:>7}  {} of {} assigned\n",
        usage_bar(feedback.usage),
        feedback.usage.to_string(),
        feedback.assigned.format_with_symbol(symbol),
        feedback.available.format_with_symbol(symbol),
    );

    let line = match feedback.status {
        BudgetStatus::Balanced => "Balanced: every unit is assigned".to_string(),
        BudgetStatus::Surplus(rem) => format!(
            "Surplus: {} still unassigned",
            rem.format_with_symbol(symbol)
        ),
        BudgetStatus::Deficit(over) => format!(
            "Deficit: over budget by {}",
            over.format_with_symbol(symbol)
        ),
    };
    output.push_str(&line);
    output.push('\n');

    if !feedback.can_submit() {
        output.push_str("This allocation cannot be saved until it fits the available income.\n");
    }

    output
}

/// Format a successful reconciliation
pub fn format_reconciliation(result: &Reconciliation, symbol: &str) -> String {
    let mut output = String::new();

    let width = result
        .allocation
        .keys()
        .map(|k| k.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    for (category, percent) in result.allocation.iter() {
        output.push_str(&format!(
            "  {:<width$}  {:>8}\n",
            category,
            percent.to_string(),
            width = width
        ));
    }

    if let Some(under) = &result.under_allocated {
        output.push_str(&format!(
            "\n{} was unassigned and has been added to '{}'.\n",
            under.remainder.format_with_symbol(symbol),
            under.category
        ));
    }

    output
}
