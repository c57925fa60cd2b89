//! Display formatting for terminal output
//!
//! Plain-text renderers for categories, budgets, the allocation calculator,
//! transactions and savings plans.

pub mod budget;
pub mod category;
pub mod savings;
pub mod transaction;

pub use budget::{format_budget_details, format_budget_list, format_calculator};
pub use category::{format_category_details, format_category_list};
pub use savings::format_savings_plan;
pub use transaction::{
    format_transaction_details, format_transaction_list, format_transaction_stats,
};
