//! Management plan model
//!
//! A management plan splits a monthly income into a savings target and a
//! percentage allocation across spending categories. Percentages are always
//! relative to the plan's *available income*:
//!
//! ```text
//! available = total_income - desired_savings - extraordinary_expense_total
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::distribution::{CategoryAmounts, PercentageAllocation};
use super::ids::PlanId;
use super::money::Money;
use super::percent::Percent;

/// Name under which some backends report one-off expenses inside the
/// allocation map. Never part of an editable allocation.
pub const EXTRAORDINARY_EXPENSE_CATEGORIES: &[&str] =
    &["Extraordinary Expense", "Gasto Extraordinario"];

/// Whether a category is the extraordinary-expense pseudo-category
pub fn is_extraordinary_category(name: &str) -> bool {
    EXTRAORDINARY_EXPENSE_CATEGORIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(name.trim()))
}

/// Validation errors for management plans
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanValidationError {
    EmptyName,
    NonPositiveIncome,
    NegativeSavings,
    SavingsNotBelowIncome,
    ZeroDuration,
    NegativePercentage(String),
    PercentagesDoNotSumTo100(Percent),
    AmountOutOfRange,
}

impl fmt::Display for PlanValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Plan name cannot be empty"),
            Self::NonPositiveIncome => write!(f, "Total income must be greater than zero"),
            Self::NegativeSavings => write!(f, "Desired savings cannot be negative"),
            Self::SavingsNotBelowIncome => {
                write!(f, "Desired savings must be less than total income")
            }
            Self::ZeroDuration => write!(f, "Duration must be at least one month"),
            Self::NegativePercentage(cat) => {
                write!(f, "Percentage for '{}' cannot be negative", cat)
            }
            Self::PercentagesDoNotSumTo100(sum) => {
                write!(f, "Category percentages must sum to 100.00%, got {}", sum)
            }
            Self::AmountOutOfRange => write!(f, "Amount is too large"),
        }
    }
}

impl std::error::Error for PlanValidationError {}

/// One user's budget plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagementPlan {
    pub id: PlanId,

    pub name: String,

    /// Monthly income baseline
    pub total_income: Money,

    /// Savings target, strictly below `total_income`
    pub desired_savings: Money,

    /// Informational only
    pub duration_months: u32,

    /// Category -> percentage of available income
    #[serde(default)]
    pub category_allocation: PercentageAllocation,

    /// Accumulated one-off expenses outside the allocation
    #[serde(default)]
    pub extraordinary_expense_total: Money,

    /// Accumulated one-off income registered against this plan
    #[serde(default)]
    pub extraordinary_income_total: Money,

    /// Set while the store refuses allocation updates
    #[serde(default)]
    pub locked: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ManagementPlan {
    /// Create a plan with a fresh ID and an empty allocation
    pub fn new(
        name: impl Into<String>,
        total_income: Money,
        desired_savings: Money,
        duration_months: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PlanId::new(),
            name: name.into(),
            total_income,
            desired_savings,
            duration_months,
            category_allocation: PercentageAllocation::new(),
            extraordinary_expense_total: Money::zero(),
            extraordinary_income_total: Money::zero(),
            locked: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Income left to distribute across categories
    pub fn available_income(&self) -> Money {
        self.total_income
            .saturating_sub(self.desired_savings)
            .saturating_sub(self.extraordinary_expense_total)
    }

    /// Current allocation expressed as amounts of available income
    pub fn category_amounts(&self) -> CategoryAmounts {
        let available = self.available_income();
        self.category_allocation
            .iter()
            .map(|(cat, pct)| (cat, pct.apply(available)))
            .collect()
    }

    /// Replace the stored percentages
    pub fn set_allocation(&mut self, allocation: PercentageAllocation) {
        self.category_allocation = allocation;
        self.updated_at = Utc::now();
    }

    /// Register one-off income: raises total income
    pub fn add_extraordinary_income(&mut self, amount: Money) -> Result<(), PlanValidationError> {
        let income_total = self.extraordinary_income_total.checked_add(amount);
        let total_income = self.total_income.checked_add(amount);
        let (Some(income_total), Some(total_income)) = (income_total, total_income) else {
            return Err(PlanValidationError::AmountOutOfRange);
        };
        self.extraordinary_income_total = income_total;
        self.total_income = total_income;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Register a one-off expense: shrinks available income for future edits
    pub fn add_extraordinary_expense(&mut self, amount: Money) -> Result<(), PlanValidationError> {
        self.extraordinary_expense_total = self
            .extraordinary_expense_total
            .checked_add(amount)
            .ok_or(PlanValidationError::AmountOutOfRange)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Validate the plan
    pub fn validate(&self) -> Result<(), PlanValidationError> {
        if self.name.trim().is_empty() {
            return Err(PlanValidationError::EmptyName);
        }
        if !self.total_income.is_positive() {
            return Err(PlanValidationError::NonPositiveIncome);
        }
        if self.desired_savings.is_negative() {
            return Err(PlanValidationError::NegativeSavings);
        }
        if self.desired_savings >= self.total_income {
            return Err(PlanValidationError::SavingsNotBelowIncome);
        }
        if self.duration_months == 0 {
            return Err(PlanValidationError::ZeroDuration);
        }
        validate_allocation(&self.category_allocation)
    }
}

/// Check that an allocation is empty, or non-negative and summing to 100.00%
pub fn validate_allocation(allocation: &PercentageAllocation) -> Result<(), PlanValidationError> {
    if allocation.is_empty() {
        return Ok(());
    }
    if let Some((cat, _)) = allocation.iter().find(|(_, p)| p.is_negative()) {
        return Err(PlanValidationError::NegativePercentage(cat.to_string()));
    }
    let sum = allocation
        .values()
        .fold(Percent::zero(), |acc, p| acc.saturating_add(*p));
    if sum != Percent::HUNDRED {
        return Err(PlanValidationError::PercentagesDoNotSumTo100(sum));
    }
    Ok(())
}

impl fmt::Display for ManagementPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (income: {}, savings: {}, {} months)",
            self.name, self.total_income, self.desired_savings, self.duration_months
        )
    }
}

/// Input for plan creation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPlan {
    pub name: String,
    pub total_income: Money,
    #[serde(default)]
    pub desired_savings: Money,
    pub duration_months: u32,
    /// Initial percentages; may be empty
    #[serde(default)]
    pub category_allocation: PercentageAllocation,
}

impl NewPlan {
    /// Build the plan this input describes (not yet validated)
    pub fn into_plan(self) -> ManagementPlan {
        let mut plan = ManagementPlan::new(
            self.name.trim(),
            self.total_income,
            self.desired_savings,
            self.duration_months,
        );
        plan.category_allocation = self.category_allocation;
        plan
    }
}
