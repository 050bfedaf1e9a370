//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer.

pub mod audit;
pub mod plan;

pub use audit::handle_audit_command;
pub use plan::{handle_plan_command, ExportFormat, PlanCommands};
