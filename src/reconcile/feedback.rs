//! Live validation feedback
//!
//! A read-only classification of in-progress edits, cheap enough to run on
//! every keystroke. It shares [`OVERAGE_TOLERANCE`] with the engine, so a
//! `Balanced` or `Surplus` status never turns into `BudgetExceeded` when the
//! same amounts are submitted.

use serde::Serialize;
use std::fmt;

use super::OVERAGE_TOLERANCE;
use crate::models::{CategoryAmounts, ManagementPlan, Money, Percent};

/// How edited amounts compare with available income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "amount", rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Within tolerance of available income
    Balanced,
    /// Income left unassigned; will be moved to the catch-all on submit
    Surplus(Money),
    /// Amounts exceed available income; submission will be rejected
    Deficit(Money),
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetStatus::Balanced => write!(f, "Distribution balanced."),
            BudgetStatus::Surplus(remainder) => {
                write!(f, "{} left over (goes to the catch-all category)", remainder)
            }
            BudgetStatus::Deficit(overage) => write!(f, "Over budget by {}", overage),
        }
    }
}

/// Classify edits against available income
pub fn classify(edits: &CategoryAmounts, available: Money) -> BudgetStatus {
    let assigned = Money::saturating_sum(edits.values());
    status_for(available.saturating_sub(assigned))
}

fn status_for(remainder: Money) -> BudgetStatus {
    if remainder < -OVERAGE_TOLERANCE {
        BudgetStatus::Deficit(remainder.abs())
    } else if remainder > OVERAGE_TOLERANCE {
        BudgetStatus::Surplus(remainder)
    } else {
        BudgetStatus::Balanced
    }
}

/// Everything a validation bar needs to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetFeedback {
    pub assigned: Money,
    pub available: Money,
    /// Share of available income assigned, capped at 100%
    pub usage: Percent,
    pub status: BudgetStatus,
}

impl BudgetFeedback {
    /// Whether a submit action should be enabled
    pub fn can_submit(&self) -> bool {
        self.available.is_positive() && !matches!(self.status, BudgetStatus::Deficit(_))
    }
}

/// Full feedback for edits against a plan snapshot
pub fn feedback(plan: &ManagementPlan, edits: &CategoryAmounts) -> BudgetFeedback {
    let available = plan.available_income();
    let assigned = Money::saturating_sum(edits.values());
    let usage = if available.is_positive() {
        Percent::of(assigned.max(Money::zero()), available).min(Percent::HUNDRED)
    } else {
        Percent::zero()
    };

    BudgetFeedback {
        assigned,
        available,
        usage,
        status: status_for(available.saturating_sub(assigned)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::engine::{reconcile, ReconcileOptions};

    fn units(n: i64) -> Money {
        Money::from_units(n, 0)
    }

    fn edits(entries: &[(&str, Money)]) -> CategoryAmounts {
        entries.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn plan() -> ManagementPlan {
        ManagementPlan::new("Test", units(10000), units(2000), 12)
    }

    #[test]
    fn test_classify_balanced() {
        let e = edits(&[("Housing", units(4000)), ("Food", units(4000))]);
        assert_eq!(classify(&e, units(8000)), BudgetStatus::Balanced);

        // Exactly one unit either side is still balanced
        let e = edits(&[("Housing", units(8001))]);
        assert_eq!(classify(&e, units(8000)), BudgetStatus::Balanced);
        let e = edits(&[("Housing", units(7999))]);
        assert_eq!(classify(&e, units(8000)), BudgetStatus::Balanced);
    }

    #[test]
    fn test_classify_surplus() {
        let e = edits(&[("Housing", units(4000)), ("Other", Money::zero())]);
        assert_eq!(classify(&e, units(8000)), BudgetStatus::Surplus(units(4000)));
    }

    #[test]
    fn test_classify_deficit() {
        let e = edits(&[("Housing", units(8500))]);
        assert_eq!(classify(&e, units(8000)), BudgetStatus::Deficit(units(500)));
    }

    #[test]
    fn test_feedback_usage_capped() {
        let f = feedback(&plan(), &edits(&[("Housing", units(9000))]));
        assert_eq!(f.usage, Percent::HUNDRED);
        assert!(!f.can_submit());

        let f = feedback(&plan(), &edits(&[("Housing", units(2000))]));
        assert_eq!(f.usage, Percent::from_hundredths(2500));
        assert!(f.can_submit());
    }

    #[test]
    fn test_feedback_without_funds_blocks_submit() {
        let plan = ManagementPlan::new("Test", units(5000), units(5000), 1);
        let f = feedback(&plan, &CategoryAmounts::new());

        assert_eq!(f.status, BudgetStatus::Balanced);
        assert_eq!(f.usage, Percent::zero());
        assert!(!f.can_submit());
    }

    #[test]
    fn test_agrees_with_reconcile() {
        let plan = plan();
        let cases = [
            edits(&[("Housing", Money::from_cents(800_100))]),
            edits(&[("Housing", Money::from_cents(799_900)), ("Other", Money::zero())]),
            edits(&[("Housing", units(100)), ("Other", Money::zero())]),
            edits(&[("Housing", Money::from_cents(800_101))]),
        ];

        for e in &cases {
            let status = classify(e, plan.available_income());
            let result = reconcile(&plan, e, &ReconcileOptions::default());
            match status {
                BudgetStatus::Balanced | BudgetStatus::Surplus(_) => assert!(result.is_ok()),
                BudgetStatus::Deficit(_) => assert!(result.is_err()),
            }
        }
    }

    #[test]
    fn test_huge_amounts_report_deficit() {
        let half = Money::from_cents(i64::MAX / 2 + 10);
        let e = edits(&[("A", half), ("B", half)]);

        assert!(matches!(classify(&e, units(8000)), BudgetStatus::Deficit(_)));
        let f = feedback(&plan(), &e);
        assert_eq!(f.usage, Percent::HUNDRED);
        assert!(!f.can_submit());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(
            BudgetStatus::Deficit(units(500)).to_string(),
            "Over budget by $500.00"
        );
    }
}
