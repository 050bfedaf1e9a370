//! Plan persistence interface
//!
//! The reconciler never talks to storage. Everything that persists or reads
//! a plan goes through this trait, so the local JSON repository can be
//! swapped for a remote backend without touching the service layer.

use crate::error::FinplanResult;
use crate::models::{ManagementPlan, Money, NewPlan, PercentageAllocation, PlanId};

pub trait PlanStore {
    /// Fetch one plan snapshot
    fn get_plan(&self, id: PlanId) -> FinplanResult<Option<ManagementPlan>>;

    /// All plans, oldest first
    fn list_plans(&self) -> FinplanResult<Vec<ManagementPlan>>;

    /// Validate and persist a new plan; the store assigns the ID
    fn create_plan(&self, plan: NewPlan) -> FinplanResult<ManagementPlan>;

    /// Replace a plan's percentages
    ///
    /// Fails with `FinplanError::PlanLocked` while the plan is not editable.
    fn update_percentages(
        &self,
        id: PlanId,
        percentages: &PercentageAllocation,
    ) -> FinplanResult<ManagementPlan>;

    /// Register one-off income (`amount` > 0)
    fn register_extra_income(&self, id: PlanId, amount: Money) -> FinplanResult<ManagementPlan>;

    /// Register a one-off expense (`amount` > 0)
    fn register_extra_expense(&self, id: PlanId, amount: Money) -> FinplanResult<ManagementPlan>;

    /// Delete a plan, returning it if it existed
    fn delete_plan(&self, id: PlanId) -> FinplanResult<Option<ManagementPlan>>;
}
