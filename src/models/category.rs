//! Category model
//!
//! Categories are either income sources or expense targets. Expense categories
//! are the rows the allocation calculator distributes a budget across.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// Maximum length of a category name
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Whether money flows in or out through a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// A budget category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Income or expense
    pub kind: CategoryKind,

    /// Display color in `#rrggbb` form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            kind,
            color: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Shorthand for an expense category
    pub fn expense(name: impl Into<String>) -> Self {
        Self::new(name, CategoryKind::Expense)
    }

    /// Shorthand for an income category
    pub fn income(name: impl Into<String>) -> Self {
        Self::new(name, CategoryKind::Income)
    }

    /// Builder-style color setter
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == CategoryKind::Expense
    }

    /// Rename the category
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        let len = self.name.chars().count();
        if len > MAX_CATEGORY_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong(len));
        }

        if let Some(color) = &self.color {
            if !is_hex_color(color) {
                return Err(CategoryValidationError::InvalidColor(color.clone()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Starter categories written by `init`
pub fn default_categories() -> Vec<Category> {
    let income = ["Salary", "Freelance", "Other Income"]
        .into_iter()
        .map(Category::income);

    let expense = [
        ("Housing", "#8e44ad"),
        ("Groceries", "#27ae60"),
        ("Transport", "#2980b9"),
        ("Health", "#c0392b"),
        ("Entertainment", "#f39c12"),
        ("Savings", "#16a085"),
    ]
    .into_iter()
    .map(|(name, color)| Category::expense(name).with_color(color));

    income.chain(expense).collect()
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Category name too long ({} chars, max {})",
                len, MAX_CATEGORY_NAME_LEN
            ),
            Self::InvalidColor(c) => write!(f, "Invalid color '{}', expected #rrggbb", c),
        }
    }
}

impl std::error::Error for CategoryValidationError {}
