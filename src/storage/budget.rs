//! Budget repository for JSON storage
//!
//! Budgets live in `data/budgets.json`, newest period first.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::models::{Budget, BudgetId, CategoryId};

use super::file_io::{read_json, read_lock, write_json_atomic, write_lock};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<Budget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    budgets: RwLock<HashMap<BudgetId, Budget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            budgets: RwLock::new(HashMap::new()),
        }
    }

    /// Load budgets from disk, replacing the cache
    pub fn load(&self) -> Result<(), PlannerError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut budgets = write_lock(&self.budgets)?;
        budgets.clear();
        budgets.extend(file_data.budgets.into_iter().map(|b| (b.id, b)));

        Ok(())
    }

    pub fn save(&self) -> Result<(), PlannerError> {
        let file_data = BudgetData {
            budgets: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, PlannerError> {
        Ok(read_lock(&self.budgets)?.get(&id).cloned())
    }

    /// All budgets, most recent start date first
    pub fn get_all(&self) -> Result<Vec<Budget>, PlannerError> {
        let budgets = read_lock(&self.budgets)?;
        let mut list: Vec<_> = budgets.values().cloned().collect();
        list.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(list)
    }

    /// Case-insensitive lookup by name
    pub fn find_by_name(&self, name: &str) -> Result<Option<Budget>, PlannerError> {
        let budgets = read_lock(&self.budgets)?;
        let name_lower = name.trim().to_lowercase();
        Ok(budgets
            .values()
            .find(|b| b.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Budgets whose period contains `date`
    pub fn get_active_on(&self, date: NaiveDate) -> Result<Vec<Budget>, PlannerError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|b| b.is_active_on(date))
            .collect())
    }

    /// Budgets that reference a category as income or expense
    pub fn get_referencing(&self, category_id: CategoryId) -> Result<Vec<Budget>, PlannerError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|b| b.references(category_id))
            .collect())
    }

    pub fn upsert(&self, budget: Budget) -> Result<(), PlannerError> {
        write_lock(&self.budgets)?.insert(budget.id, budget);
        Ok(())
    }

    pub fn delete(&self, id: BudgetId) -> Result<bool, PlannerError> {
        Ok(write_lock(&self.budgets)?.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, PlannerError> {
        Ok(read_lock(&self.budgets)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_repo() -> (TempDir, BudgetRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");
        let repo = BudgetRepository::new(path);
        (temp_dir, repo)
    }

    fn budget(name: &str, month: u32) -> Budget {
        Budget::new(
            name,
            date(2025, month, 1),
            date(2025, month, 28),
            Money::from_units(10_000),
        )
    }

    #[test]
    fn test_upsert_and_ordering() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(budget("February", 2)).unwrap();
        repo.upsert(budget("March", 3)).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all[0].name, "March");
        assert_eq!(all[1].name, "February");
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let mut march = budget("March", 3);
        let food = CategoryId::new();
        march.expense_categories.push(food);
        march.expense_allocations.insert(food, Money::from_units(2500));
        let id = march.id;
        repo.upsert(march).unwrap();
        repo.save().unwrap();

        let repo2 = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        repo2.load().unwrap();

        let loaded = repo2.get(id).unwrap().unwrap();
        assert_eq!(loaded.allocation(food), Money::from_units(2500));
    }

    #[test]
    fn test_lookups() {
        let (_temp_dir, repo) = create_test_repo();
        let mut march = budget("March", 3);
        let rent = CategoryId::new();
        march.expense_categories.push(rent);
        repo.upsert(march).unwrap();
        repo.upsert(budget("April", 4)).unwrap();

        assert!(repo.find_by_name("march").unwrap().is_some());
        assert_eq!(repo.get_active_on(date(2025, 4, 10)).unwrap().len(), 1);
        assert_eq!(repo.get_referencing(rent).unwrap()[0].name, "March");
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let march = budget("March", 3);
        let id = march.id;
        repo.upsert(march).unwrap();

        assert!(repo.delete(id).unwrap());
        assert!(repo.get(id).unwrap().is_none());
    }
}
