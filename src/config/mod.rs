//! Configuration module for Budget Planner
//!
//! This module provides configuration management including:
//! - platform-aware path resolution
//! - user settings persistence
//! - calculator tuning

pub mod paths;
pub mod settings;

pub use paths::PlannerPaths;
pub use settings::Settings;
