//! Plan analysis summary
//!
//! A read-only, informational digest of a plan. Nothing in the reconciler
//! depends on it.

use serde::{Deserialize, Serialize};

use super::money::Money;
use super::percent::Percent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanAnalysis {
    /// Allocated spending plus extraordinary expenses
    pub total_expenses: Money,

    /// Desired savings as a share of total income
    pub savings_percentage: Percent,

    /// Category with the largest allocation, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_expense_category: Option<String>,

    #[serde(default)]
    pub recommendations: Vec<String>,
}
