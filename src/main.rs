use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use finplan::cli::{handle_audit_command, handle_plan_command, PlanCommands};
use finplan::config::{paths::FinplanPaths, settings::Settings};
use finplan::services::PlanService;
use finplan::storage::Storage;

#[derive(Parser)]
#[command(
    name = "finplan",
    version,
    about = "Management-plan budgeting from the terminal",
    long_about = "finplan keeps income plans split across spending categories. \
                  Edit category amounts and finplan reconciles them into \
                  percentages that always add up to exactly 100%."
)]
struct Cli {
    /// Data directory (defaults to ~/.config/finplan)
    #[arg(long, global = true, env = "FINPLAN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Management plan commands
    #[command(subcommand)]
    Plan(PlanCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only entries for this plan (name or ID)
        #[arg(short, long)]
        plan: Option<String>,
    },

    /// Initialize the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => FinplanPaths::with_base_dir(dir),
        None => FinplanPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let service = PlanService::new(&storage, &settings);

    match cli.command {
        Some(Commands::Plan(cmd)) => {
            handle_plan_command(&service, &settings, cmd)?;
        }
        Some(Commands::Audit { limit, plan }) => {
            handle_audit_command(&storage, &service, limit, plan)?;
        }
        Some(Commands::Init) => {
            println!("Initializing finplan at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'finplan plan create <name> --income <amount>' to create a plan.");
        }
        Some(Commands::Config) => {
            println!("finplan Configuration");
            println!("=====================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Plans file:      {}", paths.plans_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!("Initialized:     {}", if paths.is_initialized() { "yes" } else { "no" });
            println!();
            println!("Settings:");
            println!("  Currency symbol:          {}", settings.currency_symbol);
            println!("  Catch-all categories:     {}", settings.catch_all_names.join(", "));
            println!("  Create catch-all:         {}", settings.create_catch_all);
            println!("  Confirm under-allocation: {}", settings.confirm_under_allocation);
            println!("  Starter categories:       {}", settings.starter_categories.join(", "));
        }
        None => {
            println!("finplan - management-plan budgeting");
            println!();
            println!("Run 'finplan --help' for usage information.");
        }
    }

    Ok(())
}
