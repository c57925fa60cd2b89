//! Category repository for JSON storage
//!
//! Categories live in `data/categories.json`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::models::{Category, CategoryId, CategoryKind};

use super::file_io::{read_json, read_lock, write_json_atomic, write_lock};

/// On-disk layout of the categories file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryData {
    pub categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk, replacing the cache
    pub fn load(&self) -> Result<(), PlannerError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut categories = write_lock(&self.categories)?;
        categories.clear();
        categories.extend(file_data.categories.into_iter().map(|c| (c.id, c)));

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), PlannerError> {
        let file_data = CategoryData {
            categories: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, PlannerError> {
        Ok(read_lock(&self.categories)?.get(&id).cloned())
    }

    /// All categories, income first, then by creation time
    pub fn get_all(&self) -> Result<Vec<Category>, PlannerError> {
        let categories = read_lock(&self.categories)?;
        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| {
            kind_order(a.kind)
                .cmp(&kind_order(b.kind))
                .then(a.created_at.cmp(&b.created_at))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(list)
    }

    pub fn get_by_kind(&self, kind: CategoryKind) -> Result<Vec<Category>, PlannerError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|c| c.kind == kind)
            .collect())
    }

    /// Case-insensitive lookup by name
    pub fn find_by_name(&self, name: &str) -> Result<Option<Category>, PlannerError> {
        let categories = read_lock(&self.categories)?;
        let name_lower = name.trim().to_lowercase();
        Ok(categories
            .values()
            .find(|c| c.name.to_lowercase() == name_lower)
            .cloned())
    }

    pub fn upsert(&self, category: Category) -> Result<(), PlannerError> {
        write_lock(&self.categories)?.insert(category.id, category);
        Ok(())
    }

    /// Remove a category; returns whether it existed
    pub fn delete(&self, id: CategoryId) -> Result<bool, PlannerError> {
        Ok(write_lock(&self.categories)?.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, PlannerError> {
        Ok(read_lock(&self.categories)?.len())
    }
}

fn kind_order(kind: CategoryKind) -> u8 {
    match kind {
        CategoryKind::Income => 0,
        CategoryKind::Expense => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");
        let repo = CategoryRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_repository() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        let category = Category::expense("Groceries");
        let id = category.id;

        repo.upsert(category).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Groceries");
        assert!(repo.get(CategoryId::new()).unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.upsert(Category::income("Salary")).unwrap();
        repo.upsert(Category::expense("Rent").with_color("#8e44ad"))
            .unwrap();
        repo.save().unwrap();

        let repo2 = CategoryRepository::new(temp_dir.path().join("categories.json"));
        repo2.load().unwrap();

        let all = repo2.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].kind, CategoryKind::Income);
        assert_eq!(all[1].color.as_deref(), Some("#8e44ad"));
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Category::expense("Groceries")).unwrap();

        assert!(repo.find_by_name("groceries").unwrap().is_some());
        assert!(repo.find_by_name(" GROCERIES ").unwrap().is_some());
        assert!(repo.find_by_name("Rent").unwrap().is_none());
    }

    #[test]
    fn test_get_by_kind_and_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let rent = Category::expense("Rent");
        let rent_id = rent.id;
        repo.upsert(Category::income("Salary")).unwrap();
        repo.upsert(rent).unwrap();

        assert_eq!(repo.get_by_kind(CategoryKind::Expense).unwrap().len(), 1);

        assert!(repo.delete(rent_id).unwrap());
        assert!(!repo.delete(rent_id).unwrap());
        assert!(repo.get_by_kind(CategoryKind::Expense).unwrap().is_empty());
    }
}
