use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn finplan(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("finplan").unwrap();
    cmd.env("FINPLAN_DATA_DIR", dir.path()).env_remove("RUST_LOG");
    cmd
}

fn create_monthly(dir: &TempDir) {
    finplan(dir)
        .args(["plan", "create", "Monthly", "--income", "10000", "--savings", "2000", "--months", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Available income: $8000.00"));
}

#[test]
fn init_writes_settings() {
    let dir = TempDir::new().unwrap();

    finplan(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));

    assert!(dir.path().join("config.json").exists());

    finplan(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Catch-all categories:     Other, Otros"));
}

#[test]
fn create_and_list() {
    let dir = TempDir::new().unwrap();
    create_monthly(&dir);

    finplan(&dir)
        .args(["plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly").and(predicate::str::contains("Unallocated")));
}

#[test]
fn create_rejects_savings_above_income() {
    let dir = TempDir::new().unwrap();

    finplan(&dir)
        .args(["plan", "create", "Broken", "--income", "100", "--savings", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn exact_edit_is_saved() {
    let dir = TempDir::new().unwrap();
    create_monthly(&dir);

    finplan(&dir)
        .args(["plan", "edit", "Monthly", "--set", "Housing=4000", "--set", "Food=4000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved allocation for Monthly"));

    finplan(&dir)
        .args(["plan", "show", "monthly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50.00%").and(predicate::str::contains("$4000.00")));
}

#[test]
fn over_budget_edit_fails_with_overage() {
    let dir = TempDir::new().unwrap();
    create_monthly(&dir);

    finplan(&dir)
        .args(["plan", "edit", "Monthly", "--set", "Housing=9000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Over budget by $1000.00"));
}

#[test]
fn surplus_edit_needs_yes() {
    let dir = TempDir::new().unwrap();
    create_monthly(&dir);

    finplan(&dir)
        .args(["plan", "edit", "Monthly", "--set", "Housing=3000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    finplan(&dir)
        .args(["plan", "edit", "Monthly", "--set", "Housing=3000", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("has been added to 'Other'"))
        .stdout(predicate::str::contains("62.50%"));
}

#[test]
fn check_reports_deficit_without_saving() {
    let dir = TempDir::new().unwrap();
    create_monthly(&dir);

    finplan(&dir)
        .args(["plan", "check", "Monthly", "--fresh", "--set", "Housing=8500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("over budget by $500.00"));

    finplan(&dir)
        .args(["plan", "show", "Monthly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No allocation set."));
}

#[test]
fn extra_income_lock_is_cleared_on_edit() {
    let dir = TempDir::new().unwrap();
    create_monthly(&dir);

    finplan(&dir)
        .args(["plan", "income", "Monthly", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total income: $11000.00"));

    finplan(&dir)
        .args([
            "plan", "edit", "Monthly", "--fresh", "--set", "Housing=4500", "--set", "Other=4500",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared a pending income recalculation"));

    finplan(&dir)
        .args(["plan", "show", "Monthly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Active"));
}

#[test]
fn export_csv_to_stdout() {
    let dir = TempDir::new().unwrap();
    create_monthly(&dir);

    finplan(&dir)
        .args(["plan", "edit", "Monthly", "--fresh", "--set", "Housing=6000", "--set", "Other=2000"])
        .assert()
        .success();

    finplan(&dir)
        .args(["plan", "export", "Monthly", "--format", "csv"])
        .assert()
        .success()
        .stdout("category,percent,amount\nHousing,75.00,6000.00\nOther,25.00,2000.00\n");
}

#[test]
fn audit_lists_mutations() {
    let dir = TempDir::new().unwrap();
    create_monthly(&dir);

    finplan(&dir)
        .args(["plan", "expense", "Monthly", "250"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Available income: $7750.00"));

    finplan(&dir)
        .args(["audit", "--plan", "Monthly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE Plan"))
        .stdout(predicate::str::contains("UPDATE ExtraordinaryMovement"));
}

#[test]
fn delete_requires_force() {
    let dir = TempDir::new().unwrap();
    create_monthly(&dir);

    finplan(&dir)
        .args(["plan", "delete", "Monthly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    finplan(&dir)
        .args(["plan", "delete", "Monthly", "--force"])
        .assert()
        .success();

    finplan(&dir)
        .args(["plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plans found."));
}

#[test]
fn data_dir_flag_overrides_environment() {
    let env_dir = TempDir::new().unwrap();
    let flag_dir = TempDir::new().unwrap();

    finplan(&env_dir)
        .arg("--data-dir")
        .arg(flag_dir.path())
        .args(["plan", "create", "Flagged", "--income", "500"])
        .assert()
        .success();

    assert!(flag_dir.path().join("data").join("plans.json").exists());
    assert!(!env_dir.path().join("data").join("plans.json").exists());
}
