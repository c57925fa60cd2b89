//! Core data models for Budget Planner
//!
//! This module contains the persisted domain: categories, budgets, recorded
//! transactions, money and strongly typed identifiers.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod transaction;

pub use budget::{Budget, BudgetStatus, BudgetValidationError};
pub use category::{default_categories, Category, CategoryKind, CategoryValidationError};
pub use ids::{BudgetId, CategoryId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use transaction::{Transaction, TransactionValidationError};
