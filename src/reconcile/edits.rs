//! Amount edits
//!
//! Builds the category amounts an edit form starts from and parses what the
//! user typed back into `Money`. The extraordinary-expense pseudo-category is
//! dropped here so it never reaches the reconciler.

use crate::error::ReconcileError;
use crate::models::plan::is_extraordinary_category;
use crate::models::{CategoryAmounts, ManagementPlan, Money};

/// Parse one form field
///
/// Thousands separators are ignored and a blank field counts as zero.
/// Negative values parse successfully; rejecting them is the reconciler's job.
pub fn parse_amount(category: &str, raw: &str) -> Result<Money, ReconcileError> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Ok(Money::zero());
    }
    Money::parse(cleaned).map_err(|_| ReconcileError::invalid_amount(category, raw.trim()))
}

/// Parse a whole form of `(category, raw input)` pairs
pub fn parse_form<'a, I>(fields: I) -> Result<CategoryAmounts, ReconcileError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut amounts = CategoryAmounts::new();
    for (category, raw) in fields {
        let category = category.trim();
        if is_extraordinary_category(category) {
            continue;
        }
        amounts.insert(category, parse_amount(category, raw)?);
    }
    Ok(amounts)
}

/// Amounts an edit form opens with
///
/// Uses the plan's stored percentages applied to its current available
/// income. A plan without an allocation starts from the starter categories
/// at zero.
pub fn seed_from_plan(plan: &ManagementPlan, starter: &[String]) -> CategoryAmounts {
    let mut amounts: CategoryAmounts = plan
        .category_amounts()
        .into_iter()
        .filter(|(cat, _)| !is_extraordinary_category(cat))
        .collect();

    if amounts.is_empty() {
        amounts = starter
            .iter()
            .map(|cat| (cat.as_str(), Money::zero()))
            .collect();
    }

    amounts
}
