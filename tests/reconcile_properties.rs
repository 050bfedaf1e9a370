use finplan::models::{CategoryAmounts, Money, Percent};
use finplan::reconcile::{classify, reconcile_amounts, BudgetStatus, ReconcileOptions};
use finplan::ReconcileError;
use proptest::prelude::*;

fn to_edits(cents: &[i64]) -> CategoryAmounts {
    cents
        .iter()
        .enumerate()
        .map(|(i, c)| (format!("C{}", i), Money::from_cents(*c)))
        .collect()
}

fn amounts() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..=100_000_000_000, 1..12)
}

proptest! {
    #[test]
    fn allocation_sums_to_hundred_without_negatives(
        cents in amounts(),
        offset in -100i64..=10_000_000_000,
    ) {
        let available = cents.iter().sum::<i64>() + offset;
        prop_assume!(available > 0);

        let result = reconcile_amounts(
            Money::from_cents(available),
            &to_edits(&cents),
            &ReconcileOptions::default(),
        )
        .unwrap();

        let total: Percent = result.allocation.values().sum();
        prop_assert_eq!(total, Percent::HUNDRED);
        prop_assert!(result.allocation.values().all(|p| !p.is_negative()));
        prop_assert_eq!(result.allocation.len(), cents.len());
    }

    #[test]
    fn over_allocation_is_rejected(
        cents in amounts(),
        excess in 101i64..=1_000_000_000,
    ) {
        let available = cents.iter().sum::<i64>() - excess;
        prop_assume!(available > 0);

        let err = reconcile_amounts(
            Money::from_cents(available),
            &to_edits(&cents),
            &ReconcileOptions::default(),
        )
        .unwrap_err();

        prop_assert_eq!(
            err,
            ReconcileError::BudgetExceeded { overage: Money::from_cents(excess) }
        );
    }

    #[test]
    fn amounts_near_the_integer_limit_are_rejected(
        cents in prop::collection::vec(i64::MAX / 4..=i64::MAX, 4..8),
        available in 1i64..=i64::MAX / 2,
    ) {
        let result = reconcile_amounts(
            Money::from_cents(available),
            &to_edits(&cents),
            &ReconcileOptions::default(),
        );

        let is_budget_exceeded = matches!(result, Err(ReconcileError::BudgetExceeded { .. }));
        prop_assert!(is_budget_exceeded);
    }

    #[test]
    fn no_available_funds_wins_over_other_errors(
        cents in prop::collection::vec(-1_000_000i64..=i64::MAX, 0..8),
        available in i64::MIN / 2..=0,
    ) {
        let err = reconcile_amounts(
            Money::from_cents(available),
            &to_edits(&cents),
            &ReconcileOptions::default(),
        )
        .unwrap_err();

        prop_assert_eq!(
            err,
            ReconcileError::NoAvailableFunds { available: Money::from_cents(available) }
        );
    }

    #[test]
    fn submittable_feedback_reconciles(
        cents in amounts(),
        available in 1i64..=1_000_000_000_000,
    ) {
        let edits = to_edits(&cents);
        let available = Money::from_cents(available);
        let result = reconcile_amounts(available, &edits, &ReconcileOptions::default());

        match classify(&edits, available) {
            BudgetStatus::Balanced | BudgetStatus::Surplus(_) => prop_assert!(result.is_ok()),
            BudgetStatus::Deficit(_) => prop_assert!(result.is_err()),
        }
    }
}
