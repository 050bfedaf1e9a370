//! Budget reconciliation
//!
//! Turns user-edited category amounts into a percentage allocation of a
//! plan's available income that sums to exactly 100.00%. Pure functions
//! only: nothing here touches storage.
//!
//! - `engine`: the reconciliation itself (`reconcile`)
//! - `feedback`: cheap read-only classification for live form validation
//! - `edits`: building and parsing the amount edits a form produces
//!
//! # Example
//!
//! ```
//! use finplan::models::{ManagementPlan, Money};
//! use finplan::reconcile::{reconcile, ReconcileOptions};
//!
//! let plan = ManagementPlan::new("Monthly", Money::from_units(10000, 0), Money::from_units(2000, 0), 12);
//! let edits = [
//!     ("Housing", Money::from_units(4000, 0)),
//!     ("Food", Money::from_units(2000, 0)),
//!     ("Transport", Money::from_units(1000, 0)),
//!     ("Other", Money::zero()),
//! ]
//! .into_iter()
//! .collect();
//!
//! let result = reconcile(&plan, &edits, &ReconcileOptions::default()).unwrap();
//! assert_eq!(result.allocation.get("Other").unwrap().to_string(), "12.50%");
//! ```

pub mod edits;
pub mod engine;
pub mod feedback;

pub use edits::{parse_amount, parse_form, seed_from_plan};
pub use engine::{reconcile, reconcile_amounts, Reconciliation, ReconcileOptions, UnderAllocated};
pub use feedback::{classify, feedback, BudgetFeedback, BudgetStatus};

use crate::models::Money;

/// Unallocated income above this is moved into the catch-all category
pub const SLACK_TOLERANCE: Money = Money::from_cents(1);

/// Over-allocation up to this is accepted; beyond it the edit is rejected.
/// Live feedback uses the same bound for both surplus and deficit.
pub const OVERAGE_TOLERANCE: Money = Money::from_cents(100);

/// Catch-all category names recognised by default
pub const DEFAULT_CATCH_ALL_NAMES: &[&str] = &["Other", "Otros"];
