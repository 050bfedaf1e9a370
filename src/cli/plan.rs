//! Plan CLI commands
//!
//! `check` and `edit` take amounts as repeated `--set CATEGORY=AMOUNT`
//! flags. Unless `--fresh` is given they start from the plan's current
//! amounts, the same way an edit form opens pre-filled.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::config::Settings;
use crate::display::{
    format_analysis, format_feedback, format_plan_details, format_plan_list, format_reconciliation,
};
use crate::error::{FinplanError, FinplanResult};
use crate::export::{export_allocation_csv, export_plan_json, export_plan_yaml};
use crate::models::{CategoryAmounts, ManagementPlan, Money, NewPlan, Percent, PercentageAllocation};
use crate::reconcile::parse_form;
use crate::services::{PlanService, UNLOCK_EXPENSE};

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// Full plan document
    Json,
    /// Full plan document, human-readable
    Yaml,
    /// Allocation rows only
    Csv,
}

/// Plan subcommands
#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a new plan
    Create {
        /// Plan name
        name: String,
        /// Total income (e.g., "3500.00")
        #[arg(short, long)]
        income: String,
        /// Amount set aside as savings
        #[arg(short, long, default_value = "0")]
        savings: String,
        /// Plan duration in months
        #[arg(short, long, default_value = "1")]
        months: u32,
        /// Initial percentage for a category (repeatable, must total 100)
        #[arg(short, long = "allocate", value_name = "CATEGORY=PERCENT")]
        allocations: Vec<String>,
    },
    /// List all plans
    List,
    /// Show plan details and allocation
    Show {
        /// Plan name or ID
        plan: String,
    },
    /// Show budget feedback for edited amounts without saving
    Check {
        /// Plan name or ID
        plan: String,
        #[command(flatten)]
        edits: EditArgs,
    },
    /// Reconcile edited amounts into percentages and save them
    Edit {
        /// Plan name or ID
        plan: String,
        #[command(flatten)]
        edits: EditArgs,
        /// Accept moving unassigned income into a catch-all category
        #[arg(short, long)]
        yes: bool,
    },
    /// Register extraordinary income
    Income {
        /// Plan name or ID
        plan: String,
        /// Amount (e.g., "250.00")
        amount: String,
    },
    /// Register an extraordinary expense
    Expense {
        /// Plan name or ID
        plan: String,
        /// Amount (e.g., "250.00")
        amount: String,
    },
    /// Show an informational analysis of a plan
    Analysis {
        /// Plan name or ID
        plan: String,
    },
    /// Export a plan
    Export {
        /// Plan name or ID
        plan: String,
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete a plan
    Delete {
        /// Plan name or ID
        plan: String,
        /// Skip the confirmation requirement
        #[arg(short, long)]
        force: bool,
    },
}

/// Amount edits shared by `check` and `edit`
#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Amount for a category (repeatable)
    #[arg(short, long = "set", value_name = "CATEGORY=AMOUNT")]
    amounts: Vec<String>,
    /// Drop a category from the edit (repeatable)
    #[arg(short, long = "remove", value_name = "CATEGORY")]
    remove: Vec<String>,
    /// Start from an empty form instead of the plan's current amounts
    #[arg(long)]
    fresh: bool,
}

/// Handle a plan command
pub fn handle_plan_command(
    service: &PlanService<'_>,
    settings: &Settings,
    cmd: PlanCommands,
) -> FinplanResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        PlanCommands::Create {
            name,
            income,
            savings,
            months,
            allocations,
        } => {
            let input = NewPlan {
                name,
                total_income: parse_money("income", &income)?,
                desired_savings: parse_money("savings", &savings)?,
                duration_months: months,
                category_allocation: parse_allocation(&allocations)?,
            };

            let plan = service.create(input)?;

            println!("Created plan: {}", plan.name);
            println!("  Available income: {}", plan.available_income().format_with_symbol(symbol));
            println!("  ID: {}", plan.id);
        }

        PlanCommands::List => {
            let plans = service.list()?;
            println!("{}", format_plan_list(&plans, symbol));
        }

        PlanCommands::Show { plan } => {
            let plan = service.resolve(&plan)?;
            println!("{}", format_plan_details(&plan, symbol));
        }

        PlanCommands::Check { plan, edits } => {
            let plan = service.resolve(&plan)?;
            let amounts = build_edits(service, settings, &plan, &edits)?;
            let feedback = service.check(&plan, &amounts);
            print!("{}", format_feedback(&feedback, symbol));
        }

        PlanCommands::Edit { plan, edits, yes } => {
            let plan = service.resolve(&plan)?;
            let amounts = build_edits(service, settings, &plan, &edits)?;

            let applied = service
                .apply_edits(plan.id, &amounts, yes)
                .map_err(|e| match e {
                    FinplanError::ConfirmationRequired(msg) => FinplanError::ConfirmationRequired(
                        format!("{}; re-run with --yes to accept", msg),
                    ),
                    other => other,
                })?;

            if applied.unlocked {
                println!(
                    "Cleared a pending income recalculation with a {} expense.",
                    UNLOCK_EXPENSE.format_with_symbol(symbol)
                );
            }
            println!("Saved allocation for {}:", applied.plan.name);
            print!("{}", format_reconciliation(&applied.reconciliation, symbol));
        }

        PlanCommands::Income { plan, amount } => {
            let plan = service.resolve(&plan)?;
            let amount = parse_money("amount", &amount)?;
            let updated = service.register_extra_income(plan.id, amount)?;

            println!(
                "Registered {} extra income for {}",
                amount.format_with_symbol(symbol),
                updated.name
            );
            println!(
                "  Total income: {}",
                updated.total_income.format_with_symbol(symbol)
            );
        }

        PlanCommands::Expense { plan, amount } => {
            let plan = service.resolve(&plan)?;
            let amount = parse_money("amount", &amount)?;
            let updated = service.register_extra_expense(plan.id, amount)?;

            println!(
                "Registered {} extra expense for {}",
                amount.format_with_symbol(symbol),
                updated.name
            );
            println!(
                "  Available income: {}",
                updated.available_income().format_with_symbol(symbol)
            );
        }

        PlanCommands::Analysis { plan } => {
            let plan = service.resolve(&plan)?;
            let analysis = service.analysis(plan.id)?;
            println!("Analysis for {}", plan.name);
            println!();
            print!("{}", format_analysis(&analysis, symbol));
        }

        PlanCommands::Export {
            plan,
            format,
            output,
        } => {
            let plan = service.resolve(&plan)?;
            match &output {
                Some(path) => {
                    let file = File::create(path).map_err(|e| {
                        FinplanError::Export(format!("Failed to create {}: {}", path.display(), e))
                    })?;
                    let mut writer = BufWriter::new(file);
                    write_export(&plan, format, &mut writer)?;
                    writer
                        .flush()
                        .map_err(|e| FinplanError::Export(e.to_string()))?;
                    println!("Exported {} to {}", plan.name, path.display());
                }
                None => {
                    let stdout = io::stdout();
                    let mut handle = stdout.lock();
                    write_export(&plan, format, &mut handle)?;
                }
            }
        }

        PlanCommands::Delete { plan, force } => {
            let plan = service.resolve(&plan)?;
            if !force {
                return Err(FinplanError::ConfirmationRequired(format!(
                    "deleting '{}' cannot be undone; re-run with --force",
                    plan.name
                )));
            }

            let deleted = service.delete(plan.id)?;
            println!("Deleted plan: {}", deleted.name);
        }
    }

    Ok(())
}

fn write_export<W: Write>(
    plan: &ManagementPlan,
    format: ExportFormat,
    writer: &mut W,
) -> FinplanResult<()> {
    match format {
        ExportFormat::Json => export_plan_json(plan, writer, true),
        ExportFormat::Yaml => export_plan_yaml(plan, writer),
        ExportFormat::Csv => export_allocation_csv(plan, writer),
    }
}

fn parse_money(field: &str, raw: &str) -> FinplanResult<Money> {
    Money::parse(raw).map_err(|e| {
        FinplanError::Validation(format!(
            "Invalid {} '{}'. Use a format like '1000.00' or '1000': {}",
            field, raw, e
        ))
    })
}

/// Split `CATEGORY=VALUE`, splitting on the last `=`
fn split_pair(raw: &str) -> FinplanResult<(&str, &str)> {
    match raw.rsplit_once('=') {
        Some((category, value)) if !category.trim().is_empty() => Ok((category.trim(), value)),
        _ => Err(FinplanError::Validation(format!(
            "Expected CATEGORY=VALUE, got '{}'",
            raw
        ))),
    }
}

fn parse_allocation(raw: &[String]) -> FinplanResult<PercentageAllocation> {
    let mut allocation = PercentageAllocation::new();
    for entry in raw {
        let (category, value) = split_pair(entry)?;
        let percent = value
            .trim()
            .trim_end_matches('%')
            .parse::<f64>()
            .ok()
            .and_then(Percent::from_f64)
            .ok_or_else(|| {
                FinplanError::Validation(format!("Invalid percentage for '{}': {}", category, value))
            })?;
        allocation.insert(category, percent);
    }
    Ok(allocation)
}

fn build_edits(
    service: &PlanService<'_>,
    settings: &Settings,
    plan: &ManagementPlan,
    args: &EditArgs,
) -> FinplanResult<CategoryAmounts> {
    let mut edits = if args.fresh {
        CategoryAmounts::new()
    } else {
        service.seed_edits(plan, &settings.starter_categories)
    };

    let pairs = args
        .amounts
        .iter()
        .map(|raw| split_pair(raw))
        .collect::<FinplanResult<Vec<_>>>()?;

    for (category, amount) in parse_form(pairs)? {
        edits.insert(category, amount);
    }

    for category in &args.remove {
        edits.remove(category.trim());
    }

    Ok(edits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pair_uses_last_equals() {
        assert_eq!(split_pair("Food=120").unwrap(), ("Food", "120"));
        assert_eq!(split_pair("A=B=5").unwrap(), ("A=B", "5"));
        assert!(split_pair("=5").is_err());
        assert!(split_pair("Food").is_err());
    }

    #[test]
    fn test_parse_allocation() {
        let raw = vec!["Housing=62.5".to_string(), "Other=37.5%".to_string()];
        let allocation = parse_allocation(&raw).unwrap();

        assert_eq!(allocation.get("Housing"), Some(&Percent::from_hundredths(6250)));
        assert_eq!(allocation.get("Other"), Some(&Percent::from_hundredths(3750)));
        assert!(parse_allocation(&["Housing=lots".to_string()]).is_err());
        assert!(parse_allocation(&["Housing=1e300".to_string()]).is_err());
    }

    #[test]
    fn test_parse_money_error_names_field() {
        let err = parse_money("income", "abc").unwrap_err();
        assert!(err.to_string().contains("Invalid income 'abc'"));
    }
}
