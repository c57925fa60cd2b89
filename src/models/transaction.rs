//! Transaction model
//!
//! A recorded income or expense. Amounts are always positive; the direction
//! comes from the category the transaction is filed under, and `kind` is kept
//! in step with it whenever the category changes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::{Category, CategoryKind};
use super::ids::{CategoryId, TransactionId};
use super::money::Money;

/// Maximum length of a transaction description
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// A recorded income or expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    pub date: NaiveDate,

    /// Always positive
    pub amount: Money,

    pub category_id: CategoryId,

    /// Copied from the category
    pub kind: CategoryKind,

    #[serde(default)]
    pub description: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a transaction filed under `category`
    pub fn new(category: &Category, date: NaiveDate, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            date,
            amount,
            category_id: category.id,
            kind: category.kind,
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == CategoryKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == CategoryKind::Expense
    }

    /// Refile under another category, taking over its kind
    pub fn set_category(&mut self, category: &Category) {
        self.category_id = category.id;
        self.kind = category.kind;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        let len = self.description.chars().count();
        if len > MAX_DESCRIPTION_LEN {
            return Err(TransactionValidationError::DescriptionTooLong(len));
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_income() { "+" } else { "-" };
        write!(f, "{} {}{}", self.date, sign, self.amount)?;
        if !self.description.is_empty() {
            write!(f, " {}", self.description)?;
        }
        Ok(())
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    DescriptionTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be positive, got {}", amount)
            }
            Self::DescriptionTooLong(len) => write!(
                f,
                "Description too long ({} chars, max {})",
                len, MAX_DESCRIPTION_LEN
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
