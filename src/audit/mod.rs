//! Audit logging for finplan
//!
//! Every plan mutation (create, percentage update, extra income or expense,
//! delete) is appended to `audit.log` as one JSON line with the plan state
//! before and after the change.
//!
//! # Example
//!
//! ```rust,ignore
//! use finplan::audit::{AuditEntry, AuditLogger, EntityType, generate_diff};
//!
//! let logger = AuditLogger::new(audit_log_path);
//! let entry = AuditEntry::update(
//!     EntityType::Plan,
//!     plan.id.to_string(),
//!     Some(plan.name.clone()),
//!     &before,
//!     &plan,
//!     generate_diff(&before_json, &after_json),
//! );
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::{generate_detailed_diff, generate_diff};
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
