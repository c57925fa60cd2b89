//! Errors raised by the planner
//!
//! Editing allocations never fails. Errors come from loading and saving the
//! data files, from strict checks when a budget or transaction is stored, and
//! from the terminal and runtime around the calculator.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    /// Unparseable `config.json`, or no home directory to put it in
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    /// JSON printed by `--json` that failed to serialize
    #[error("JSON error: {0}")]
    Json(String),

    /// Rejected input: a budget form that fails submit, a bad date or amount
    /// on the command line, a category still referenced elsewhere
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Category and budget names are unique, case-insensitively
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Auto-allocation that could not run for a budget
    #[error("Budget error: {0}")]
    Budget(String),

    #[error("Export error: {0}")]
    Export(String),

    /// A data file that cannot be read, parsed or written, or a poisoned
    /// repository lock
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("TUI error: {0}")]
    Tui(String),

    /// The auto-allocate task panicked or was aborted
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl PlannerError {
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for PlannerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;
