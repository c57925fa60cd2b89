//! Category service
//!
//! Business rules for income and expense categories: unique names,
//! validation, and refusing to delete a category that a budget or a recorded
//! transaction still uses.

use tracing::info;

use crate::error::{PlannerError, PlannerResult};
use crate::models::{Category, CategoryId, CategoryKind};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(
        &self,
        name: &str,
        kind: CategoryKind,
        color: Option<&str>,
    ) -> PlannerResult<Category> {
        let name = name.trim();

        if self.storage.categories.find_by_name(name)?.is_some() {
            return Err(PlannerError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let mut category = Category::new(name, kind);
        if let Some(color) = color {
            category = category.with_color(color.trim());
        }

        category
            .validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        info!(category = %category.id, name = %category.name, kind = %kind, "Created category");
        Ok(category)
    }

    pub fn get(&self, id: CategoryId) -> PlannerResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find a category by name or ID string
    pub fn find(&self, identifier: &str) -> PlannerResult<Option<Category>> {
        if let Some(category) = self.storage.categories.find_by_name(identifier)? {
            return Ok(Some(category));
        }

        if let Ok(id) = identifier.trim().parse::<CategoryId>() {
            return self.storage.categories.get(id);
        }

        Ok(None)
    }

    /// Like [`find`](Self::find), but missing categories are an error
    pub fn require(&self, identifier: &str) -> PlannerResult<Category> {
        self.find(identifier)?
            .ok_or_else(|| PlannerError::category_not_found(identifier))
    }

    /// Resolve several identifiers, all of the given kind, keeping their order
    pub fn resolve_all(
        &self,
        identifiers: &[String],
        kind: CategoryKind,
    ) -> PlannerResult<Vec<Category>> {
        let mut resolved: Vec<Category> = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            let category = self.require(identifier)?;
            if category.kind != kind {
                return Err(PlannerError::Validation(format!(
                    "'{}' is an {} category, expected {}",
                    category.name, category.kind, kind
                )));
            }
            if !resolved.iter().any(|c| c.id == category.id) {
                resolved.push(category);
            }
        }
        Ok(resolved)
    }

    pub fn list(&self) -> PlannerResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    pub fn list_by_kind(&self, kind: CategoryKind) -> PlannerResult<Vec<Category>> {
        self.storage.categories.get_by_kind(kind)
    }

    /// Delete a category that no budget or transaction references
    pub fn delete(&self, id: CategoryId) -> PlannerResult<Category> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| PlannerError::category_not_found(id.to_string()))?;

        let referencing = self.storage.budgets.get_referencing(id)?;
        if !referencing.is_empty() {
            let names: Vec<_> = referencing.iter().map(|b| b.name.as_str()).collect();
            return Err(PlannerError::Validation(format!(
                "Cannot delete category '{}' - it is used by: {}",
                category.name,
                names.join(", ")
            )));
        }

        if self.storage.transactions.references_category(id)? {
            return Err(PlannerError::Validation(format!(
                "Cannot delete category '{}' - it has recorded transactions",
                category.name
            )));
        }

        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;

        info!(category = %id, name = %category.name, "Deleted category");
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PlannerPaths;
    use crate::models::{Budget, Money, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service
            .create("Groceries", CategoryKind::Expense, Some("#27ae60"))
            .unwrap();
        assert_eq!(category.name, "Groceries");
        assert_eq!(category.color.as_deref(), Some("#27ae60"));

        let found = service.find("groceries").unwrap().unwrap();
        assert_eq!(found.id, category.id);

        let by_id = service.find(&category.id.as_uuid().to_string()).unwrap();
        assert!(by_id.is_some());
    }

    #[test]
    fn test_duplicate_and_invalid() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.create("Rent", CategoryKind::Expense, None).unwrap();
        assert!(matches!(
            service.create("rent", CategoryKind::Expense, None),
            Err(PlannerError::Duplicate { .. })
        ));
        assert!(service
            .create("  ", CategoryKind::Expense, None)
            .unwrap_err()
            .is_validation());
        assert!(service
            .create("Pets", CategoryKind::Expense, Some("brown"))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_resolve_all_checks_kind() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        service.create("Salary", CategoryKind::Income, None).unwrap();
        service.create("Rent", CategoryKind::Expense, None).unwrap();

        let names = vec!["Rent".to_string(), "rent".to_string()];
        assert_eq!(service.resolve_all(&names, CategoryKind::Expense).unwrap().len(), 1);

        let wrong = vec!["Salary".to_string()];
        assert!(service.resolve_all(&wrong, CategoryKind::Expense).is_err());

        let missing = vec!["Nope".to_string()];
        assert!(service
            .resolve_all(&missing, CategoryKind::Expense)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_delete_refused_when_referenced() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let rent = service.create("Rent", CategoryKind::Expense, None).unwrap();
        let spare = service.create("Spare", CategoryKind::Expense, None).unwrap();

        let mut budget = Budget::new(
            "March",
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            Money::from_units(1000),
        );
        budget.expense_categories.push(rent.id);
        storage.budgets.upsert(budget).unwrap();

        assert!(service.delete(rent.id).unwrap_err().is_validation());
        assert_eq!(service.delete(spare.id).unwrap().name, "Spare");
        assert!(service.delete(spare.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_refused_with_transactions() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let food = service.create("Food", CategoryKind::Expense, None).unwrap();

        let txn = Transaction::new(
            &food,
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            Money::from_units(30),
        );
        let id = txn.id;
        storage.transactions.upsert(txn).unwrap();

        let err = service.delete(food.id).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("recorded transactions"));

        storage.transactions.delete(id).unwrap();
        assert_eq!(service.delete(food.id).unwrap().name, "Food");
    }
}
