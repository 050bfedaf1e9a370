//! Service layer for finplan
//!
//! Business logic on top of the storage layer: validation, reconciliation
//! policy, and audit logging.

pub mod plan;

pub use plan::{analyze, update_with_unlock_retry, AppliedEdit, PlanService, UNLOCK_EXPENSE};
