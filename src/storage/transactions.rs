//! Transaction repository for JSON storage
//!
//! Transactions live in `data/transactions.json`, newest first, with an
//! in-memory index by category.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::models::{CategoryId, Transaction, TransactionId};

use super::file_io::{read_json, read_lock, write_json_atomic, write_lock};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TransactionData {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence
///
/// Locks are always taken `data` first, then `by_category`.
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    by_category: RwLock<HashMap<CategoryId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_category: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the index
    pub fn load(&self) -> Result<(), PlannerError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        let mut by_category = write_lock(&self.by_category)?;
        data.clear();
        by_category.clear();

        for txn in file_data.transactions {
            by_category.entry(txn.category_id).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), PlannerError> {
        let file_data = TransactionData {
            transactions: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, PlannerError> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// All transactions, newest date first, then newest entry first
    pub fn get_all(&self) -> Result<Vec<Transaction>, PlannerError> {
        let data = read_lock(&self.data)?;
        let mut transactions: Vec<_> = data.values().cloned().collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    pub fn get_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Transaction>, PlannerError> {
        let data = read_lock(&self.data)?;
        let by_category = read_lock(&self.by_category)?;

        let ids = by_category
            .get(&category_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    /// Transactions dated within `start..=end`
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, PlannerError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|t| t.date >= start && t.date <= end)
            .collect())
    }

    /// Whether any transaction is filed under the category
    pub fn references_category(&self, category_id: CategoryId) -> Result<bool, PlannerError> {
        Ok(read_lock(&self.by_category)?
            .get(&category_id)
            .is_some_and(|ids| !ids.is_empty()))
    }

    /// Insert or update a transaction, moving it in the index if refiled
    pub fn upsert(&self, txn: Transaction) -> Result<(), PlannerError> {
        let mut data = write_lock(&self.data)?;
        let mut by_category = write_lock(&self.by_category)?;

        if let Some(old) = data.get(&txn.id) {
            if let Some(ids) = by_category.get_mut(&old.category_id) {
                ids.retain(|&id| id != txn.id);
            }
        }

        by_category.entry(txn.category_id).or_default().push(txn.id);
        data.insert(txn.id, txn);

        Ok(())
    }

    pub fn delete(&self, id: TransactionId) -> Result<bool, PlannerError> {
        let mut data = write_lock(&self.data)?;
        let mut by_category = write_lock(&self.by_category)?;

        let Some(txn) = data.remove(&id) else {
            return Ok(false);
        };
        if let Some(ids) = by_category.get_mut(&txn.category_id) {
            ids.retain(|&other| other != id);
        }

        Ok(true)
    }

    pub fn count(&self) -> Result<usize, PlannerError> {
        Ok(read_lock(&self.data)?.len())
    }
}

fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}
