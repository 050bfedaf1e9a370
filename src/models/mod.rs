//! Core data models for finplan
//!
//! Plans, the money and percentage types they are expressed in, and the
//! ordered category maps the reconciler works over.

pub mod analysis;
pub mod distribution;
pub mod ids;
pub mod money;
pub mod percent;
pub mod plan;

pub use analysis::PlanAnalysis;
pub use distribution::{CategoryAmounts, Distribution, PercentageAllocation};
pub use ids::PlanId;
pub use money::{Money, MoneyParseError};
pub use percent::Percent;
pub use plan::{ManagementPlan, NewPlan, PlanValidationError};
