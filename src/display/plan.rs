//! Plan display formatting
//!
//! Lists and allocations render as tables; a single plan renders as a
//! label/value block.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::{ManagementPlan, PlanAnalysis};

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Savings")]
    savings: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Months")]
    months: u32,
    #[tabled(rename = "Status")]
    status: &'static str,
}

#[derive(Tabled)]
struct AllocationRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Percent")]
    percent: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

fn status_label(plan: &ManagementPlan) -> &'static str {
    if plan.locked {
        "Locked"
    } else if plan.category_allocation.is_empty() {
        "Unallocated"
    } else {
        "Active"
    }
}

/// Format a list of plans as a table
pub fn format_plan_list(plans: &[ManagementPlan], symbol: &str) -> String {
    if plans.is_empty() {
        return "No plans found.".to_string();
    }

    let rows = plans.iter().map(|plan| PlanRow {
        id: plan.id.to_string(),
        name: plan.name.clone(),
        income: plan.total_income.format_with_symbol(symbol),
        savings: plan.desired_savings.format_with_symbol(symbol),
        available: plan.available_income().format_with_symbol(symbol),
        months: plan.duration_months,
        status: status_label(plan),
    });

    Table::new(rows)
        .with(Style::sharp())
        .with(Modify::new(Columns::new(2..6)).with(Alignment::right()))
        .to_string()
}

/// Format a plan's allocation with amounts against current available income
pub fn format_allocation(plan: &ManagementPlan, symbol: &str) -> String {
    if plan.category_allocation.is_empty() {
        return "No allocation set.".to_string();
    }

    let available = plan.available_income();
    let rows = plan
        .category_allocation
        .iter()
        .map(|(category, percent)| AllocationRow {
            category: category.to_string(),
            percent: percent.to_string(),
            amount: percent.apply(available).format_with_symbol(symbol),
        });

    Table::new(rows)
        .with(Style::sharp())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}

/// Format full plan details
pub fn format_plan_details(plan: &ManagementPlan, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Plan: {}\n", plan.name));
    output.push_str(&format!("ID:   {}\n", plan.id));
    output.push_str(&format!(
        "Income:           {:>14}\n",
        plan.total_income.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Desired savings:  {:>14}\n",
        plan.desired_savings.format_with_symbol(symbol)
    ));
    if !plan.extraordinary_income_total.is_zero() {
        output.push_str(&format!(
            "Extra income:     {:>14}\n",
            plan.extraordinary_income_total.format_with_symbol(symbol)
        ));
    }
    if !plan.extraordinary_expense_total.is_zero() {
        output.push_str(&format!(
            "Extra expenses:   {:>14}\n",
            plan.extraordinary_expense_total.format_with_symbol(symbol)
        ));
    }
    output.push_str(&format!(
        "Available:        {:>14}\n",
        plan.available_income().format_with_symbol(symbol)
    ));
    output.push_str(&format!("Duration:         {} months\n", plan.duration_months));
    output.push_str(&format!("Status:           {}\n", status_label(plan)));
    output.push_str(&format!(
        "Created:          {}\n",
        plan.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push('\n');
    output.push_str(&format_allocation(plan, symbol));

    output
}

/// Format a plan analysis
pub fn format_analysis(analysis: &PlanAnalysis, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Total expenses:   {:>14}\n",
        analysis.total_expenses.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Savings rate:     {:>14}\n",
        analysis.savings_percentage
    ));
    output.push_str(&format!(
        "Top category:     {:>14}\n",
        analysis.top_expense_category.as_deref().unwrap_or("-")
    ));

    if !analysis.recommendations.is_empty() {
        output.push_str("\nRecommendations:\n");
        for rec in &analysis.recommendations {
            output.push_str(&format!("  - {}\n", rec));
        }
    }

    output
}
