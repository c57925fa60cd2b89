//! Budget Planner - terminal budget planning with an allocation calculator
//!
//! A budget has a total amount for a period, the income categories that fund
//! it, and the expense categories it is split across. The allocation
//! calculator keeps those splits honest: it reconciles what is allocated
//! against the total, converts between amounts and percentages, and can
//! spread the total evenly in the background.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `allocation`: The allocation calculator, reconciliation and formatting
//! - `form`: The budget wizard that owns the calculator's inputs
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (categories, budgets, transactions, money)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `display`: Plain-text renderers for the CLI
//! - `export`: CSV, JSON and YAML export of allocation breakdowns
//! - `cli`: Command handlers
//! - `tui`: The interactive calculator screen
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_planner::config::{paths::PlannerPaths, settings::Settings};
//!
//! let paths = PlannerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod allocation;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod form;
pub mod models;
pub mod services;
pub mod storage;
pub mod tui;

pub use error::{PlannerError, PlannerResult};
