//! Service layer for Budget Planner
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation and cross-entity rules.

pub mod budget;
pub mod category;
pub mod savings;
pub mod transaction;

pub use budget::{BudgetActuals, BudgetProjection, BudgetService, BudgetSummary};
pub use category::CategoryService;
pub use savings::{required_savings, SavingsPlan};
pub use transaction::{
    CategoryTotal, CreateTransactionInput, TransactionFilter, TransactionPage, TransactionService,
    TransactionSort, TransactionStats, TransactionUpdate,
};
