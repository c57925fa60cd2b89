//! Savings goal CLI command

use chrono::Local;
use clap::Args;

use crate::config::settings::Settings;
use crate::display::savings::format_savings_plan;
use crate::error::{PlannerError, PlannerResult};
use crate::models::Money;
use crate::services::required_savings;

use super::budget::parse_date;

/// Arguments for the savings goal calculator
#[derive(Args)]
pub struct SavingsArgs {
    /// Amount to reach (e.g., "150000")
    #[arg(short, long)]
    pub target: String,

    /// Date to reach it by (YYYY-MM-DD)
    #[arg(short, long)]
    pub by: String,

    /// Amount already saved
    #[arg(short, long, default_value = "0")]
    pub current: String,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the savings command
pub fn handle_savings_command(settings: &Settings, args: SavingsArgs) -> PlannerResult<()> {
    let target = parse_amount("target", &args.target)?;
    let current = parse_amount("current savings", &args.current)?;
    let date = parse_date(&args.by)?;

    let plan = required_savings(target, date, current, Local::now().date_naive())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", format_savings_plan(&plan, &settings.currency_format()));
    }

    Ok(())
}

pub(crate) fn parse_amount(field: &str, raw: &str) -> PlannerResult<Money> {
    Money::parse(raw)
        .map_err(|e| PlannerError::Validation(format!("Invalid {} '{}': {}", field, raw, e)))
}
