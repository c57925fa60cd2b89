//! Storage layer for Budget Planner
//!
//! JSON file storage with atomic writes and in-memory caches guarded by
//! `RwLock`s.

pub mod budget;
pub mod categories;
pub mod file_io;
pub mod init;
pub mod transactions;

pub use budget::BudgetRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use transactions::TransactionRepository;

use crate::config::paths::PlannerPaths;
use crate::error::PlannerError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: PlannerPaths,
    pub categories: CategoryRepository,
    pub budgets: BudgetRepository,
    pub transactions: TransactionRepository,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: PlannerPaths) -> Result<Self, PlannerError> {
        paths.ensure_directories()?;

        Ok(Self {
            categories: CategoryRepository::new(paths.categories_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &PlannerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), PlannerError> {
        self.categories.load()?;
        self.budgets.load()?;
        self.transactions.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), PlannerError> {
        self.categories.save()?;
        self.budgets.save()?;
        self.transactions.save()?;
        Ok(())
    }

    /// Check if `init` has been run
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_and_load_all() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        storage.categories.upsert(Category::expense("Rent")).unwrap();
        storage.save_all().unwrap();

        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(reopened.categories.count().unwrap(), 1);
        assert_eq!(reopened.budgets.count().unwrap(), 0);
        assert_eq!(reopened.transactions.count().unwrap(), 0);
    }
}
