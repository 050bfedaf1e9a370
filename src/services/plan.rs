//! Plan service
//!
//! Business logic around the reconciler: plan lifecycle, submitting edited
//! amounts, extraordinary movements, and the informational analysis. Every
//! persisted change is written to the audit log.

use tracing::{debug, info, warn};

use crate::audit::{generate_detailed_diff, generate_diff, EntityType};
use crate::config::Settings;
use crate::error::{FinplanError, FinplanResult};
use crate::models::{
    CategoryAmounts, ManagementPlan, Money, NewPlan, Percent, PercentageAllocation, PlanAnalysis,
    PlanId,
};
use crate::reconcile::{self, BudgetFeedback, Reconciliation, ReconcileOptions, OVERAGE_TOLERANCE};
use crate::storage::{PlanStore, Storage};

/// Expense registered to clear a pending income recalculation
pub const UNLOCK_EXPENSE: Money = Money::from_cents(1);

/// Savings share below which a plan gets a recommendation
const LOW_SAVINGS: Percent = Percent::from_hundredths(1000);

/// Single-category share above which a plan gets a recommendation
const DOMINANT_CATEGORY: Percent = Percent::from_hundredths(5000);

/// Extraordinary-expense share of income above which a plan gets a recommendation
const HIGH_EXTRA_EXPENSES: Percent = Percent::from_hundredths(1000);

/// Result of a submitted edit
#[derive(Debug, Clone)]
pub struct AppliedEdit {
    /// The plan as persisted
    pub plan: ManagementPlan,
    pub reconciliation: Reconciliation,
    /// An unlock expense was registered before the update went through
    pub unlocked: bool,
}

/// Service for management plans
pub struct PlanService<'a> {
    storage: &'a Storage,
    options: ReconcileOptions,
    confirm_under_allocation: bool,
}

impl<'a> PlanService<'a> {
    pub fn new(storage: &'a Storage, settings: &Settings) -> Self {
        Self {
            storage,
            options: ReconcileOptions::from(settings),
            confirm_under_allocation: settings.confirm_under_allocation,
        }
    }

    /// Create a plan
    pub fn create(&self, input: NewPlan) -> FinplanResult<ManagementPlan> {
        let plan = self.storage.plans.create_plan(input)?;

        self.storage.log_create(
            EntityType::Plan,
            plan.id.to_string(),
            Some(plan.name.clone()),
            &plan,
        )?;

        Ok(plan)
    }

    pub fn list(&self) -> FinplanResult<Vec<ManagementPlan>> {
        self.storage.plans.list_plans()
    }

    pub fn get(&self, id: PlanId) -> FinplanResult<ManagementPlan> {
        self.storage
            .plans
            .get_plan(id)?
            .ok_or_else(|| FinplanError::plan_not_found(id.to_string()))
    }

    /// Find a plan by ID, ID prefix, or exact name (case-insensitive)
    pub fn resolve(&self, reference: &str) -> FinplanResult<ManagementPlan> {
        let plans = self.list()?;

        if let Some(plan) = plans.iter().find(|p| p.id.matches(reference)) {
            return Ok(plan.clone());
        }

        let mut by_name = plans
            .into_iter()
            .filter(|p| p.name.eq_ignore_ascii_case(reference.trim()));

        match (by_name.next(), by_name.next()) {
            (Some(plan), None) => Ok(plan),
            (Some(_), Some(_)) => Err(FinplanError::Validation(format!(
                "More than one plan is named '{}'; use its ID instead",
                reference.trim()
            ))),
            (None, _) => Err(FinplanError::plan_not_found(reference)),
        }
    }

    /// Amounts an edit starts from
    pub fn seed_edits(&self, plan: &ManagementPlan, starter: &[String]) -> CategoryAmounts {
        reconcile::seed_from_plan(plan, starter)
    }

    /// Live feedback for edits without reconciling or persisting anything
    pub fn check(&self, plan: &ManagementPlan, edits: &CategoryAmounts) -> BudgetFeedback {
        reconcile::feedback(plan, edits)
    }

    /// Reconcile edited amounts and persist the resulting percentages
    ///
    /// A surplus that would be moved into a catch-all needs `confirmed` when
    /// the settings ask for confirmation. Leftovers within
    /// [`OVERAGE_TOLERANCE`] are what live feedback calls balanced, so they
    /// are absorbed without asking. Nothing is persisted on any error.
    pub fn apply_edits(
        &self,
        id: PlanId,
        edits: &CategoryAmounts,
        confirmed: bool,
    ) -> FinplanResult<AppliedEdit> {
        let before = self.get(id)?;
        let reconciliation = reconcile::reconcile(&before, edits, &self.options)?;

        if let Some(under) = &reconciliation.under_allocated {
            let needs_confirmation = self.confirm_under_allocation && !confirmed;
            if needs_confirmation && under.remainder > OVERAGE_TOLERANCE {
                return Err(FinplanError::ConfirmationRequired(format!(
                    "{} is unassigned and would be added to '{}'",
                    under.remainder, under.category
                )));
            }
        }

        let (plan, unlocked) =
            update_with_unlock_retry(&self.storage.plans, id, &reconciliation.allocation)?;

        if unlocked {
            self.storage.log_update(
                EntityType::ExtraordinaryMovement,
                id.to_string(),
                Some(plan.name.clone()),
                &before.extraordinary_expense_total,
                &plan.extraordinary_expense_total,
                Some(format!("unlock expense: {}", UNLOCK_EXPENSE)),
            )?;
        }

        let diff = generate_detailed_diff(
            &serde_json::to_value(&before.category_allocation)?,
            &serde_json::to_value(&plan.category_allocation)?,
            "category_allocation",
        );
        self.storage.log_update(
            EntityType::Allocation,
            id.to_string(),
            Some(plan.name.clone()),
            &before.category_allocation,
            &plan.category_allocation,
            (!diff.is_empty()).then(|| diff.join(", ")),
        )?;

        Ok(AppliedEdit {
            plan,
            reconciliation,
            unlocked,
        })
    }

    /// Register one-off income
    pub fn register_extra_income(&self, id: PlanId, amount: Money) -> FinplanResult<ManagementPlan> {
        let before = self.get(id)?;
        let plan = self.storage.plans.register_extra_income(id, amount)?;
        self.log_movement(&before, &plan, format!("income +{}", amount))?;
        Ok(plan)
    }

    /// Register a one-off expense
    pub fn register_extra_expense(&self, id: PlanId, amount: Money) -> FinplanResult<ManagementPlan> {
        let before = self.get(id)?;
        let plan = self.storage.plans.register_extra_expense(id, amount)?;
        self.log_movement(&before, &plan, format!("expense +{}", amount))?;
        Ok(plan)
    }

    fn log_movement(
        &self,
        before: &ManagementPlan,
        after: &ManagementPlan,
        label: String,
    ) -> FinplanResult<()> {
        let diff = generate_diff(&serde_json::to_value(before)?, &serde_json::to_value(after)?);
        let summary = match diff {
            Some(d) => format!("{}; {}", label, d),
            None => label,
        };
        self.storage.log_update(
            EntityType::ExtraordinaryMovement,
            after.id.to_string(),
            Some(after.name.clone()),
            before,
            after,
            Some(summary),
        )
    }

    /// Delete a plan
    pub fn delete(&self, id: PlanId) -> FinplanResult<ManagementPlan> {
        let plan = self
            .storage
            .plans
            .delete_plan(id)?
            .ok_or_else(|| FinplanError::plan_not_found(id.to_string()))?;

        self.storage.log_delete(
            EntityType::Plan,
            plan.id.to_string(),
            Some(plan.name.clone()),
            &plan,
        )?;

        Ok(plan)
    }

    /// Informational summary of a plan
    pub fn analysis(&self, id: PlanId) -> FinplanResult<PlanAnalysis> {
        Ok(analyze(&self.get(id)?))
    }
}

/// Persist percentages, clearing a pending lock once if needed
///
/// On `PlanLocked` this registers `UNLOCK_EXPENSE` and retries exactly once.
/// Returns the updated plan and whether the unlock was needed.
pub fn update_with_unlock_retry<S: PlanStore + ?Sized>(
    store: &S,
    id: PlanId,
    allocation: &PercentageAllocation,
) -> FinplanResult<(ManagementPlan, bool)> {
    match store.update_percentages(id, allocation) {
        Ok(plan) => Ok((plan, false)),
        Err(FinplanError::PlanLocked(reason)) => {
            debug!(plan = %id, %reason, "plan locked, registering unlock expense");
            store.register_extra_expense(id, UNLOCK_EXPENSE)?;
            let plan = store.update_percentages(id, allocation).map_err(|e| {
                warn!(plan = %id, error = %e, "update failed after unlock");
                e
            })?;
            info!(plan = %id, "percentages saved after unlock");
            Ok((plan, true))
        }
        Err(e) => Err(e),
    }
}

/// Build the informational summary of a plan
pub fn analyze(plan: &ManagementPlan) -> PlanAnalysis {
    let savings_percentage = Percent::of(plan.desired_savings, plan.total_income);
    let top_expense_category = plan.category_allocation.largest().map(str::to_string);

    let mut recommendations = Vec::new();

    if plan.category_allocation.is_empty() {
        recommendations
            .push("No category allocation is set yet; edit the plan to distribute income".into());
    }

    if savings_percentage < LOW_SAVINGS {
        recommendations.push(format!(
            "Savings are {} of income; aim for at least {}",
            savings_percentage, LOW_SAVINGS
        ));
    }

    if let Some((category, share)) = plan
        .category_allocation
        .iter()
        .find(|(_, p)| **p > DOMINANT_CATEGORY)
    {
        recommendations.push(format!(
            "'{}' takes {} of spending; consider spreading it across categories",
            category, share
        ));
    }

    let extra_share = Percent::of(plan.extraordinary_expense_total, plan.total_income);
    if extra_share > HIGH_EXTRA_EXPENSES {
        recommendations.push(format!(
            "Extraordinary expenses are {} of income",
            extra_share
        ));
    }

    PlanAnalysis {
        total_expenses: plan
            .available_income()
            .saturating_add(plan.extraordinary_expense_total),
        savings_percentage,
        top_expense_category,
        recommendations,
    }
}
