//! Custom error types for finplan
//!
//! Two layers: `ReconcileError` is the typed validation taxonomy returned by
//! the budget reconciler, and `FinplanError` covers everything around it
//! (storage, configuration, export). Reconciler errors are wrapped, never
//! flattened into strings, so callers can still render specific guidance.

use thiserror::Error;

use crate::models::Money;

/// Validation failures detected by the budget reconciler
///
/// These are reported before any percentage computation runs, so a failed
/// reconciliation never yields a partial allocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// Available income (income - savings - extraordinary expenses) is zero or negative
    #[error("No funds available to distribute (available income is {available})")]
    NoAvailableFunds { available: Money },

    /// A submitted category amount is negative or could not be parsed
    #[error("Invalid amount for '{category}': {value}")]
    InvalidAmount { category: String, value: String },

    /// The proposed amounts exceed available income beyond the tolerance
    #[error("Over budget by {overage}")]
    BudgetExceeded { overage: Money },

    /// There is no category to allocate into
    #[error("No categories to allocate")]
    NoCategories,
}

impl ReconcileError {
    /// Create an invalid amount error for a category
    pub fn invalid_amount(category: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidAmount {
            category: category.into(),
            value: value.to_string(),
        }
    }
}

/// The main error type for finplan operations
#[derive(Error, Debug)]
pub enum FinplanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The persistence layer refused an update because the plan is locked
    #[error("Plan is not currently editable: {0}")]
    PlanLocked(String),

    /// Budget reconciliation failed validation
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// A surplus would be reassigned and the user has not confirmed it
    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FinplanError {
    /// Create a "not found" error for plans
    pub fn plan_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Plan",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error (model or reconciliation)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Reconcile(_))
    }

    /// Whether retrying the same operation may succeed
    ///
    /// Transport and lock failures are retryable; validation never is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Storage(_) | Self::PlanLocked(_))
    }
}

impl From<std::io::Error> for FinplanError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FinplanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for finplan operations
pub type FinplanResult<T> = Result<T, FinplanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FinplanError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = FinplanError::plan_not_found("Vacaciones");
        assert_eq!(err.to_string(), "Plan not found: Vacaciones");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_budget_exceeded_display() {
        let err = ReconcileError::BudgetExceeded {
            overage: Money::from_cents(50000),
        };
        assert_eq!(err.to_string(), "Over budget by $500.00");
    }

    #[test]
    fn test_reconcile_error_is_transparent() {
        let err: FinplanError = ReconcileError::NoCategories.into();
        assert_eq!(err.to_string(), "No categories to allocate");
        assert!(err.is_validation());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(FinplanError::PlanLocked("p".into()).is_retryable());
        assert!(FinplanError::Storage("disk".into()).is_retryable());
        assert!(!FinplanError::Validation("bad".into()).is_retryable());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FinplanError = io_err.into();
        assert!(matches!(err, FinplanError::Io(_)));
    }
}
