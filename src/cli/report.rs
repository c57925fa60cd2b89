//! Income and expense report command

use clap::Args;

use crate::display::transaction::format_transaction_stats;
use crate::error::{PlannerError, PlannerResult};
use crate::services::{BudgetService, TransactionService};
use crate::storage::Storage;

use super::budget::parse_date;

/// Arguments for the transaction report
#[derive(Args)]
pub struct ReportArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(short, long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(short, long)]
    pub to: Option<String>,

    /// Report over a budget's period (alternative to from/to)
    #[arg(short, long, conflicts_with_all = ["from", "to"])]
    pub budget: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the report command
pub fn handle_report_command(storage: &Storage, args: ReportArgs) -> PlannerResult<()> {
    let (start, end) = match &args.budget {
        Some(identifier) => {
            let budget = BudgetService::new(storage).require(identifier)?;
            (Some(budget.start_date), Some(budget.end_date))
        }
        None => (
            args.from.as_deref().map(parse_date).transpose()?,
            args.to.as_deref().map(parse_date).transpose()?,
        ),
    };

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(PlannerError::Validation(format!(
                "Report starts {} after it ends {}",
                start, end
            )));
        }
    }

    let stats = TransactionService::new(storage).statistics(start, end)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", format_transaction_stats(&stats));
    }

    Ok(())
}
