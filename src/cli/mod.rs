//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod category;
pub mod report;
pub mod savings;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use report::{handle_report_command, ReportArgs};
pub use savings::{handle_savings_command, SavingsArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};
