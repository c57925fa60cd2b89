//! Budget model
//!
//! A saved budget: a total amount for a date range, the income categories
//! that fund it, and the numeric allocation per expense category. Budgets are
//! produced by submitting the budget form; while editing, allocations live in
//! the form as raw text instead.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::ids::{BudgetId, CategoryId};
use super::money::Money;

/// Maximum length of a budget name
pub const MAX_BUDGET_NAME_LEN: usize = 100;

/// Where a budget period sits relative to a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Upcoming,
    Active,
    Completed,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upcoming => write!(f, "upcoming"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A stored budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// First day of the budget period
    pub start_date: NaiveDate,

    /// Last day of the budget period
    pub end_date: NaiveDate,

    /// Amount available to allocate
    pub total_amount: Money,

    /// Income categories funding this budget
    #[serde(default)]
    pub income_categories: Vec<CategoryId>,

    /// Selected expense categories, in display order
    #[serde(default)]
    pub expense_categories: Vec<CategoryId>,

    /// Allocated amount per expense category
    #[serde(default)]
    pub expense_allocations: BTreeMap<CategoryId, Money>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create an empty budget for a date range
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_amount: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            name: name.into(),
            description: String::new(),
            start_date,
            end_date,
            total_amount,
            income_categories: Vec::new(),
            expense_categories: Vec::new(),
            expense_allocations: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sum of all allocations
    pub fn allocated(&self) -> Money {
        self.expense_allocations.values().copied().sum()
    }

    /// Total minus allocations; negative means over-allocated
    pub fn unallocated(&self) -> Money {
        self.total_amount - self.allocated()
    }

    /// Allocation for one category (zero when absent)
    pub fn allocation(&self, category_id: CategoryId) -> Money {
        self.expense_allocations
            .get(&category_id)
            .copied()
            .unwrap_or_default()
    }

    /// Whether `date` falls inside the budget period (inclusive)
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn status_on(&self, date: NaiveDate) -> BudgetStatus {
        if date < self.start_date {
            BudgetStatus::Upcoming
        } else if date > self.end_date {
            BudgetStatus::Completed
        } else {
            BudgetStatus::Active
        }
    }

    /// Days in the period, both ends included
    pub fn total_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Check whether a category is referenced anywhere in this budget
    pub fn references(&self, category_id: CategoryId) -> bool {
        self.income_categories.contains(&category_id)
            || self.expense_categories.contains(&category_id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.name.trim().is_empty() {
            return Err(BudgetValidationError::EmptyName);
        }

        let len = self.name.chars().count();
        if len > MAX_BUDGET_NAME_LEN {
            return Err(BudgetValidationError::NameTooLong(len));
        }

        if self.end_date < self.start_date {
            return Err(BudgetValidationError::EndBeforeStart);
        }

        if self.total_amount.is_negative() {
            return Err(BudgetValidationError::NegativeTotal);
        }

        for (category_id, amount) in &self.expense_allocations {
            if amount.is_negative() {
                return Err(BudgetValidationError::NegativeAllocation(*category_id));
            }
            if !self.expense_categories.contains(category_id) {
                return Err(BudgetValidationError::UnselectedCategory(*category_id));
            }
        }

        let allocated = self.allocated();
        if allocated > self.total_amount {
            return Err(BudgetValidationError::OverAllocated {
                allocated,
                total: self.total_amount,
            });
        }

        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} – {}): {}",
            self.name, self.start_date, self.end_date, self.total_amount
        )
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyName,
    NameTooLong(usize),
    EndBeforeStart,
    NegativeTotal,
    NegativeAllocation(CategoryId),
    UnselectedCategory(CategoryId),
    OverAllocated { allocated: Money, total: Money },
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Budget name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Budget name too long ({} chars, max {})",
                len, MAX_BUDGET_NAME_LEN
            ),
            Self::EndBeforeStart => write!(f, "End date must not be before start date"),
            Self::NegativeTotal => write!(f, "Total amount cannot be negative"),
            Self::NegativeAllocation(id) => {
                write!(f, "Allocation for {} cannot be negative", id)
            }
            Self::UnselectedCategory(id) => {
                write!(f, "Allocation for {} but it is not a selected expense", id)
            }
            Self::OverAllocated { allocated, total } => write!(
                f,
                "Allocated {} exceeds the total of {}",
                allocated, total
            ),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
