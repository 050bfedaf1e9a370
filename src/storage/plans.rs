//! Plan repository for JSON storage
//!
//! Keeps plans in memory behind a lock and writes `plans.json` after every
//! mutation, mirroring what a remote backend would persist per request.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::info;

use crate::error::{FinplanError, FinplanResult};
use crate::models::plan::validate_allocation;
use crate::models::{ManagementPlan, Money, NewPlan, PercentageAllocation, PlanId};

use super::file_io::{read_json, write_json_atomic};
use super::traits::PlanStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PlanData {
    #[serde(default)]
    plans: Vec<ManagementPlan>,
}

/// Repository for management plans
pub struct PlanRepository {
    path: PathBuf,
    plans: RwLock<HashMap<PlanId, ManagementPlan>>,
}

impl PlanRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            plans: RwLock::new(HashMap::new()),
        }
    }

    /// Load plans from disk
    pub fn load(&self) -> FinplanResult<()> {
        let file_data: PlanData = read_json(&self.path)?;

        let mut plans = self
            .plans
            .write()
            .map_err(|e| FinplanError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        plans.clear();
        for plan in file_data.plans {
            plans.insert(plan.id, plan);
        }

        Ok(())
    }

    /// Save plans to disk
    pub fn save(&self) -> FinplanResult<()> {
        let plans = self
            .plans
            .read()
            .map_err(|e| FinplanError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = PlanData {
            plans: sorted(plans.values().cloned().collect()),
        };

        write_json_atomic(&self.path, &file_data)
    }

    pub fn count(&self) -> FinplanResult<usize> {
        let plans = self
            .plans
            .read()
            .map_err(|e| FinplanError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(plans.len())
    }

    /// Apply `change` to a stored plan, then persist
    fn modify<F>(&self, id: PlanId, change: F) -> FinplanResult<ManagementPlan>
    where
        F: FnOnce(&mut ManagementPlan) -> FinplanResult<()>,
    {
        let updated = {
            let mut plans = self.plans.write().map_err(|e| {
                FinplanError::Storage(format!("Failed to acquire write lock: {}", e))
            })?;

            let plan = plans
                .get_mut(&id)
                .ok_or_else(|| FinplanError::plan_not_found(id.to_string()))?;

            // Work on a copy so a failed change leaves the stored plan untouched
            let mut candidate = plan.clone();
            change(&mut candidate)?;
            *plan = candidate.clone();
            candidate
        };

        self.save()?;
        Ok(updated)
    }
}

fn sorted(mut plans: Vec<ManagementPlan>) -> Vec<ManagementPlan> {
    plans.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
    plans
}

fn require_positive(amount: Money, what: &str) -> FinplanResult<()> {
    if !amount.is_positive() {
        return Err(FinplanError::Validation(format!(
            "{} must be greater than zero, got {}",
            what, amount
        )));
    }
    Ok(())
}

impl PlanStore for PlanRepository {
    fn get_plan(&self, id: PlanId) -> FinplanResult<Option<ManagementPlan>> {
        let plans = self
            .plans
            .read()
            .map_err(|e| FinplanError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(plans.get(&id).cloned())
    }

    fn list_plans(&self) -> FinplanResult<Vec<ManagementPlan>> {
        let plans = self
            .plans
            .read()
            .map_err(|e| FinplanError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(sorted(plans.values().cloned().collect()))
    }

    fn create_plan(&self, new_plan: NewPlan) -> FinplanResult<ManagementPlan> {
        let plan = new_plan.into_plan();
        plan.validate()
            .map_err(|e| FinplanError::Validation(e.to_string()))?;

        {
            let mut plans = self.plans.write().map_err(|e| {
                FinplanError::Storage(format!("Failed to acquire write lock: {}", e))
            })?;
            plans.insert(plan.id, plan.clone());
        }

        self.save()?;
        info!(plan = %plan.id, name = %plan.name, "created plan");
        Ok(plan)
    }

    fn update_percentages(
        &self,
        id: PlanId,
        percentages: &PercentageAllocation,
    ) -> FinplanResult<ManagementPlan> {
        validate_allocation(percentages).map_err(|e| FinplanError::Validation(e.to_string()))?;

        let plan = self.modify(id, |plan| {
            if plan.locked {
                return Err(FinplanError::PlanLocked(format!(
                    "{} has a pending income recalculation",
                    plan.name
                )));
            }
            plan.set_allocation(percentages.clone());
            Ok(())
        })?;

        info!(plan = %id, categories = percentages.len(), "updated percentages");
        Ok(plan)
    }

    fn register_extra_income(&self, id: PlanId, amount: Money) -> FinplanResult<ManagementPlan> {
        require_positive(amount, "Extra income")?;

        let plan = self.modify(id, |plan| {
            plan.add_extraordinary_income(amount)
                .map_err(|e| FinplanError::Validation(e.to_string()))?;
            plan.locked = true;
            Ok(())
        })?;

        info!(plan = %id, %amount, "registered extra income");
        Ok(plan)
    }

    fn register_extra_expense(&self, id: PlanId, amount: Money) -> FinplanResult<ManagementPlan> {
        require_positive(amount, "Extra expense")?;

        let plan = self.modify(id, |plan| {
            plan.add_extraordinary_expense(amount)
                .map_err(|e| FinplanError::Validation(e.to_string()))?;
            plan.locked = false;
            Ok(())
        })?;

        info!(plan = %id, %amount, "registered extra expense");
        Ok(plan)
    }

    fn delete_plan(&self, id: PlanId) -> FinplanResult<Option<ManagementPlan>> {
        let removed = {
            let mut plans = self.plans.write().map_err(|e| {
                FinplanError::Storage(format!("Failed to acquire write lock: {}", e))
            })?;
            plans.remove(&id)
        };

        if removed.is_some() {
            self.save()?;
            info!(plan = %id, "deleted plan");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Percent;
    use tempfile::TempDir;

    fn new_plan(name: &str) -> NewPlan {
        NewPlan {
            name: name.to_string(),
            total_income: Money::from_units(10000, 0),
            desired_savings: Money::from_units(2000, 0),
            duration_months: 12,
            category_allocation: PercentageAllocation::new(),
        }
    }

    fn create_test_repo() -> (TempDir, PlanRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = PlanRepository::new(temp_dir.path().join("plans.json"));
        (temp_dir, repo)
    }

    fn full_allocation() -> PercentageAllocation {
        [
            ("Housing", Percent::from_hundredths(7500)),
            ("Other", Percent::from_hundredths(2500)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_create_and_get() {
        let (_temp_dir, repo) = create_test_repo();

        let plan = repo.create_plan(new_plan("Monthly")).unwrap();
        let retrieved = repo.get_plan(plan.id).unwrap().unwrap();

        assert_eq!(retrieved.name, "Monthly");
        assert_eq!(retrieved.available_income(), Money::from_units(8000, 0));
    }

    #[test]
    fn test_create_rejects_invalid_plan() {
        let (_temp_dir, repo) = create_test_repo();
        let mut input = new_plan("Broken");
        input.desired_savings = input.total_income;

        let result = repo.create_plan(input);
        assert!(matches!(result, Err(FinplanError::Validation(_))));
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plans.json");

        let id = {
            let repo = PlanRepository::new(path.clone());
            let plan = repo.create_plan(new_plan("Monthly")).unwrap();
            repo.update_percentages(plan.id, &full_allocation()).unwrap();
            plan.id
        };

        let repo = PlanRepository::new(path);
        repo.load().unwrap();
        let plan = repo.get_plan(id).unwrap().unwrap();
        assert_eq!(plan.category_allocation, full_allocation());
    }

    #[test]
    fn test_update_rejects_bad_sum() {
        let (_temp_dir, repo) = create_test_repo();
        let plan = repo.create_plan(new_plan("Monthly")).unwrap();
        let bad: PercentageAllocation = [("Housing", Percent::from_hundredths(9000))]
            .into_iter()
            .collect();

        assert!(matches!(
            repo.update_percentages(plan.id, &bad),
            Err(FinplanError::Validation(_))
        ));
    }

    #[test]
    fn test_extra_income_locks_and_expense_unlocks() {
        let (_temp_dir, repo) = create_test_repo();
        let plan = repo.create_plan(new_plan("Monthly")).unwrap();

        let plan = repo
            .register_extra_income(plan.id, Money::from_units(500, 0))
            .unwrap();
        assert!(plan.locked);
        assert_eq!(plan.total_income, Money::from_units(10500, 0));

        assert!(matches!(
            repo.update_percentages(plan.id, &full_allocation()),
            Err(FinplanError::PlanLocked(_))
        ));

        let plan = repo
            .register_extra_expense(plan.id, Money::from_cents(1))
            .unwrap();
        assert!(!plan.locked);
        assert_eq!(plan.extraordinary_expense_total, Money::from_cents(1));

        assert!(repo.update_percentages(plan.id, &full_allocation()).is_ok());
    }

    #[test]
    fn test_extra_amounts_must_be_positive() {
        let (_temp_dir, repo) = create_test_repo();
        let plan = repo.create_plan(new_plan("Monthly")).unwrap();

        assert!(repo.register_extra_income(plan.id, Money::zero()).is_err());
        assert!(repo
            .register_extra_expense(plan.id, Money::from_cents(-100))
            .is_err());
    }

    #[test]
    fn test_unknown_plan() {
        let (_temp_dir, repo) = create_test_repo();
        let err = repo
            .register_extra_expense(PlanId::new(), Money::from_cents(100))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let plan = repo.create_plan(new_plan("Monthly")).unwrap();

        assert!(repo.delete_plan(plan.id).unwrap().is_some());
        assert!(repo.get_plan(plan.id).unwrap().is_none());
        assert!(repo.delete_plan(plan.id).unwrap().is_none());
    }

    #[test]
    fn test_list_oldest_first() {
        let (_temp_dir, repo) = create_test_repo();
        repo.create_plan(new_plan("First")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        repo.create_plan(new_plan("Second")).unwrap();

        let names: Vec<_> = repo
            .list_plans()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }
}
