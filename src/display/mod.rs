//! Display formatting for terminal output

pub mod feedback;
pub mod plan;

pub use feedback::{format_feedback, format_reconciliation};
pub use plan::{format_allocation, format_analysis, format_plan_details, format_plan_list};
