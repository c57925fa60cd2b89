use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use budget_planner::cli::{
    handle_budget_command, handle_category_command, handle_report_command, handle_savings_command,
    handle_transaction_command, BudgetCommands, CategoryCommands, ReportArgs, SavingsArgs,
    TransactionCommands,
};
use budget_planner::config::{paths::PlannerPaths, settings::Settings};
use budget_planner::storage::Storage;

const LOG_ENV: &str = "BUDGET_PLANNER_LOG";
const DEFAULT_LOG_FILTER: &str = "budget_planner=info";

#[derive(Parser)]
#[command(
    name = "budget",
    version,
    about = "Terminal budget planner",
    long_about = "Budget Planner splits a budget's total across expense categories. \
                  Allocate by amount, by percentage, or evenly, and see what is \
                  left to allocate as you go. Record transactions to compare \
                  spending against each budget."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default categories
    Init,

    /// Show current configuration and paths
    Config,

    /// Category management commands
    #[command(subcommand, alias = "cat")]
    Category(CategoryCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Record and browse income and expenses
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Income and expense totals by category
    Report(ReportArgs),

    /// Work out the monthly savings needed to reach a goal
    Savings(SavingsArgs),
}

impl Commands {
    fn is_interactive(&self) -> bool {
        matches!(self, Commands::Budget(BudgetCommands::Edit { .. }))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = PlannerPaths::new()?;
    let interactive = cli.command.as_ref().is_some_and(Commands::is_interactive);
    let _log_guard = init_logging(&paths, interactive)?;

    let settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Budget Planner at: {}", paths.base_dir().display());
            budget_planner::storage::init::initialize_storage(&paths)?;
            let mut settings = settings;
            settings.setup_completed = true;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Default income and expense categories have been created.");
            println!("Run 'budget category list' to see them.");
        }
        Some(Commands::Config) => {
            println!("Budget Planner Configuration");
            println!("============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Transactions:     {}", paths.transactions_file().display());
            println!("Log file:         {}", paths.log_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:      {}", settings.currency_symbol);
            println!("  Stepper increment:    {}", settings.stepper_increment);
            println!("  Slider step:          {}%", settings.slider_step);
            println!("  Auto-allocate delay:  {} ms", settings.auto_allocate_delay_ms);
            println!("  Default period:       {} days", settings.default_period_days);
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, runtime.handle(), cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, cmd)?;
        }
        Some(Commands::Report(args)) => {
            handle_report_command(&storage, args)?;
        }
        Some(Commands::Savings(args)) => {
            handle_savings_command(&settings, args)?;
        }
        None => {
            println!("Budget Planner - split a budget across expense categories");
            println!();
            if !storage.is_initialized() {
                println!("Run 'budget init' to get started.");
            }
            println!("Run 'budget --help' for usage information.");
        }
    }

    Ok(())
}

/// Install the tracing subscriber
///
/// The TUI owns the terminal, so interactive sessions log to a file instead
/// of stderr. The returned guard flushes the file writer on drop.
fn init_logging(paths: &PlannerPaths, interactive: bool) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if interactive {
        paths.ensure_directories()?;
        let log_file = paths.log_file();
        let directory = log_file
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| paths.base_dir().to_path_buf());
        let file_name = log_file
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "planner.log".into());

        let appender = tracing_appender::rolling::never(directory, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        Ok(None)
    }
}
