//! Path management for Budget Planner
//!
//! ## Path Resolution Order
//!
//! 1. `BUDGET_PLANNER_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config`, `~/Library/Application Support`,
//!    `%APPDATA%`) joined with `budget-planner`

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::PlannerError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "BUDGET_PLANNER_DATA_DIR";

/// Manages all paths used by Budget Planner
#[derive(Debug, Clone)]
pub struct PlannerPaths {
    /// Base directory for all Budget Planner data
    base_dir: PathBuf,
}

impl PlannerPaths {
    /// Create a new PlannerPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// override variable is not set.
    pub fn new() -> Result<Self, PlannerError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create PlannerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the log file used while the TUI owns the terminal
    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join("planner.log")
    }

    /// Get the path to categories.json
    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    /// Get the path to budgets.json
    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Get the path to transactions.json
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), PlannerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PlannerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| PlannerError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if Budget Planner has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, PlannerError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| PlannerError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("budget-planner"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.log_file(), temp_dir.path().join("planner.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.budgets_file(),
            temp_dir.path().join("data").join("budgets.json")
        );
        assert_eq!(
            paths.categories_file(),
            temp_dir.path().join("data").join("categories.json")
        );
        assert_eq!(
            paths.transactions_file(),
            temp_dir.path().join("data").join("transactions.json")
        );
    }
}
