//! Reconciliation engine
//!
//! Validation runs first and fails fast, in this order:
//!
//! 1. available income must be positive (`NoAvailableFunds`)
//! 2. every amount must be non-negative (`InvalidAmount`)
//! 3. the amounts may exceed available income by at most
//!    [`OVERAGE_TOLERANCE`] (`BudgetExceeded`)
//!
//! Then any unallocated slack is added to a catch-all category, every
//! amount is converted to a two-decimal percentage of available income, and
//! the rounding error is folded into the largest percentage so that the
//! result sums to exactly 100.00%.

use serde::Serialize;
use tracing::debug;

use super::{DEFAULT_CATCH_ALL_NAMES, OVERAGE_TOLERANCE, SLACK_TOLERANCE};
use crate::config::settings::Settings;
use crate::error::ReconcileError;
use crate::models::{CategoryAmounts, ManagementPlan, Money, Percent, PercentageAllocation};

/// Catch-all selection policy
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Names that mark a category as the catch-all, in order of preference
    pub catch_all_names: Vec<String>,
    /// Create the first catch-all name at zero when no edit carries one
    pub create_catch_all: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            catch_all_names: DEFAULT_CATCH_ALL_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            create_catch_all: false,
        }
    }
}

impl From<&Settings> for ReconcileOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            catch_all_names: settings.catch_all_names.clone(),
            create_catch_all: settings.create_catch_all,
        }
    }
}

/// Slack that was silently reassigned during reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnderAllocated {
    /// Available income the edits left unassigned
    pub remainder: Money,
    /// Category that absorbed it
    pub category: String,
}

/// Successful reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Category percentages summing to exactly 100.00%
    pub allocation: PercentageAllocation,
    /// Set when slack was moved into a catch-all category
    pub under_allocated: Option<UnderAllocated>,
    /// The available income the percentages are relative to
    pub available_income: Money,
}

impl Reconciliation {
    pub fn is_under_allocated(&self) -> bool {
        self.under_allocated.is_some()
    }
}

/// Reconcile edited amounts against a plan snapshot
pub fn reconcile(
    plan: &ManagementPlan,
    edits: &CategoryAmounts,
    options: &ReconcileOptions,
) -> Result<Reconciliation, ReconcileError> {
    reconcile_amounts(plan.available_income(), edits, options)
}

/// Reconcile edited amounts against an explicit available income
pub fn reconcile_amounts(
    available: Money,
    edits: &CategoryAmounts,
    options: &ReconcileOptions,
) -> Result<Reconciliation, ReconcileError> {
    if !available.is_positive() {
        return Err(ReconcileError::NoAvailableFunds { available });
    }

    if let Some((category, amount)) = edits.iter().find(|(_, a)| a.is_negative()) {
        return Err(ReconcileError::invalid_amount(
            category,
            amount.to_decimal_string(),
        ));
    }

    // Amounts are non-negative here, so an overflowing sum is an overage
    let Some(assigned) = Money::checked_sum(edits.values()) else {
        return Err(ReconcileError::BudgetExceeded {
            overage: Money::saturating_sum(edits.values()).saturating_sub(available),
        });
    };
    let overage = assigned - available;
    if overage > OVERAGE_TOLERANCE {
        return Err(ReconcileError::BudgetExceeded { overage });
    }

    let mut amounts = edits.clone();
    let slack = available - assigned;
    let under_allocated = if slack > SLACK_TOLERANCE {
        let category = select_catch_all(&mut amounts, options).ok_or(ReconcileError::NoCategories)?;
        debug!(%category, %slack, "absorbing unallocated income");
        if let Some(amount) = amounts.get_mut(&category) {
            *amount += slack;
        }
        Some(UnderAllocated {
            remainder: slack,
            category,
        })
    } else {
        None
    };

    if amounts.is_empty() {
        return Err(ReconcileError::NoCategories);
    }

    let mut allocation: PercentageAllocation = amounts
        .iter()
        .map(|(cat, amount)| (cat, Percent::of(*amount, available)))
        .collect();

    let total: Percent = allocation.values().sum();
    let diff = Percent::HUNDRED - total;
    if diff != Percent::zero() {
        debug!(%diff, "folding rounding difference into largest category");
        fold_rounding_diff(&mut allocation, diff);
    }

    Ok(Reconciliation {
        allocation,
        under_allocated,
        available_income: available,
    })
}

/// Pick (or create) the category that receives slack
///
/// A configured catch-all name present in the edits wins, even at zero.
/// Otherwise a missing catch-all is created when allowed; failing that the
/// largest amount is used, earliest entry first on ties.
fn select_catch_all(amounts: &mut CategoryAmounts, options: &ReconcileOptions) -> Option<String> {
    if let Some(name) = options
        .catch_all_names
        .iter()
        .find(|name| amounts.contains_key(name))
    {
        return Some(name.clone());
    }

    if options.create_catch_all {
        if let Some(name) = options.catch_all_names.first() {
            amounts.insert(name.clone(), Money::zero());
            return Some(name.clone());
        }
    }

    amounts.largest().map(str::to_string)
}

/// Apply `diff` so the allocation sums to exactly 100.00%
///
/// A positive diff goes to the largest percentage. A negative diff is taken
/// from the largest percentage, spilling into the next largest if it would
/// otherwise go below zero.
fn fold_rounding_diff(allocation: &mut PercentageAllocation, diff: Percent) {
    if diff > Percent::zero() {
        if let Some(largest) = allocation.largest().map(str::to_string) {
            if let Some(pct) = allocation.get_mut(&largest) {
                *pct += diff;
            }
        }
        return;
    }

    // Stable sort keeps first-seen order among equal percentages
    let mut order: Vec<(String, Percent)> = allocation
        .iter()
        .map(|(cat, pct)| (cat.to_string(), *pct))
        .collect();
    order.sort_by(|a, b| b.1.cmp(&a.1));

    let mut remaining = Percent::zero() - diff;
    for (cat, current) in order {
        if remaining == Percent::zero() {
            break;
        }
        let take = remaining.min(current);
        if let Some(pct) = allocation.get_mut(&cat) {
            *pct = current - take;
        }
        remaining = remaining - take;
    }
}
