//! Transaction service
//!
//! Records income and expenses against categories, lists them with filters
//! and paging, and aggregates them into per-category statistics.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::error::{PlannerError, PlannerResult};
use crate::models::{Category, CategoryId, CategoryKind, Money, Transaction, TransactionId};
use crate::storage::Storage;

/// Shortest id prefix accepted when looking a transaction up
const MIN_ID_PREFIX: usize = 4;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Field to order a listing by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionSort {
    #[default]
    Date,
    Amount,
}

/// Options for filtering and paging transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub category_id: Option<CategoryId>,
    pub kind: Option<CategoryKind>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort: TransactionSort,
    /// Oldest or smallest first; the default is newest or largest first
    pub ascending: bool,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn kind(mut self, kind: CategoryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn sort_by(mut self, sort: TransactionSort, ascending: bool) -> Self {
        self.sort = sort;
        self.ascending = ascending;
        self
    }

    pub fn page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = Some(limit);
        self.offset = offset;
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        self.kind.map_or(true, |kind| txn.kind == kind)
            && self.start_date.map_or(true, |start| txn.date >= start)
            && self.end_date.map_or(true, |end| txn.date <= end)
    }
}

/// One page of a filtered listing
#[derive(Debug, Clone)]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    /// Matches before paging
    pub total: usize,
}

/// Input for recording a transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub date: NaiveDate,
    pub amount: Money,
    pub category_id: CategoryId,
    pub description: Option<String>,
}

/// Fields to change on an existing transaction; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub date: Option<NaiveDate>,
    pub amount: Option<Money>,
    pub category_id: Option<CategoryId>,
    pub description: Option<String>,
}

/// Income or expense total for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub name: String,
    pub amount: Money,
    pub count: usize,
    /// Share of the income or expense total, to two decimals
    pub percentage: f64,
}

/// Aggregate view of the transactions in a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionStats {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_income: Money,
    pub total_expense: Money,
    /// Income minus expense
    pub balance: Money,
    pub income_breakdown: Vec<CategoryTotal>,
    pub expense_breakdown: Vec<CategoryTotal>,
    pub transaction_count: usize,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a transaction; its kind is taken from the category
    pub fn create(&self, input: CreateTransactionInput) -> PlannerResult<Transaction> {
        let category = self.category(input.category_id)?;

        let mut txn = Transaction::new(&category, input.date, input.amount);
        if let Some(description) = input.description {
            txn.description = description.trim().to_string();
        }

        txn.validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        info!(
            transaction = %txn.id,
            category = %category.name,
            kind = %txn.kind,
            amount = %txn.amount,
            "Recorded transaction"
        );
        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> PlannerResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full ID or by the short form shown in listings
    ///
    /// A prefix that matches more than one transaction is rejected.
    pub fn find(&self, identifier: &str) -> PlannerResult<Option<Transaction>> {
        let identifier = identifier.trim();
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.storage.transactions.get(id);
        }

        let prefix = identifier
            .strip_prefix("txn-")
            .unwrap_or(identifier)
            .to_lowercase();
        if prefix.len() < MIN_ID_PREFIX {
            return Ok(None);
        }

        let mut matches = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| t.id.as_uuid().to_string().starts_with(&prefix));

        let first = matches.next();
        if matches.next().is_some() {
            return Err(PlannerError::Validation(format!(
                "'{}' matches more than one transaction, use more of the ID",
                identifier
            )));
        }
        Ok(first)
    }

    pub fn require(&self, identifier: &str) -> PlannerResult<Transaction> {
        self.find(identifier)?
            .ok_or_else(|| PlannerError::transaction_not_found(identifier))
    }

    /// List transactions matching `filter`, sorted and paged
    pub fn list(&self, filter: &TransactionFilter) -> PlannerResult<TransactionPage> {
        let mut transactions = match filter.category_id {
            Some(category_id) => self.storage.transactions.get_by_category(category_id)?,
            None => self.storage.transactions.get_all()?,
        };
        transactions.retain(|t| filter.matches(t));

        // Storage order is newest first, which is the default for dates.
        match (filter.sort, filter.ascending) {
            (TransactionSort::Date, false) => {}
            (TransactionSort::Date, true) => transactions.reverse(),
            (TransactionSort::Amount, false) => {
                transactions.sort_by(|a, b| b.amount.cmp(&a.amount))
            }
            (TransactionSort::Amount, true) => {
                transactions.sort_by(|a, b| a.amount.cmp(&b.amount))
            }
        }

        let total = transactions.len();
        let items = transactions
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect();

        Ok(TransactionPage { items, total })
    }

    pub fn list_for_category(&self, category_id: CategoryId) -> PlannerResult<Vec<Transaction>> {
        self.storage.transactions.get_by_category(category_id)
    }

    pub fn update(&self, id: TransactionId, update: TransactionUpdate) -> PlannerResult<Transaction> {
        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| PlannerError::transaction_not_found(id.to_string()))?;

        if let Some(date) = update.date {
            txn.date = date;
        }
        if let Some(amount) = update.amount {
            txn.amount = amount;
        }
        if let Some(category_id) = update.category_id {
            let category = self.category(category_id)?;
            txn.set_category(&category);
        }
        if let Some(description) = update.description {
            txn.description = description.trim().to_string();
        }
        txn.touch();

        txn.validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        info!(transaction = %txn.id, "Updated transaction");
        Ok(txn)
    }

    pub fn delete(&self, id: TransactionId) -> PlannerResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| PlannerError::transaction_not_found(id.to_string()))?;

        self.storage.transactions.delete(id)?;
        self.storage.transactions.save()?;

        info!(transaction = %id, "Deleted transaction");
        Ok(txn)
    }

    /// Income and expense totals for the period, broken down by category
    ///
    /// Either bound may be left open. Breakdowns are sorted by amount,
    /// largest first.
    pub fn statistics(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> PlannerResult<TransactionStats> {
        let filter = TransactionFilter::new().date_range(start_date, end_date);
        let transactions = self.list(&filter)?.items;

        let mut by_category: HashMap<CategoryId, (CategoryKind, Money, usize)> = HashMap::new();
        let mut total_income = Money::zero();
        let mut total_expense = Money::zero();

        for txn in &transactions {
            let entry = by_category
                .entry(txn.category_id)
                .or_insert((txn.kind, Money::zero(), 0));
            entry.1 += txn.amount;
            entry.2 += 1;

            match txn.kind {
                CategoryKind::Income => total_income += txn.amount,
                CategoryKind::Expense => total_expense += txn.amount,
            }
        }

        let mut income_breakdown = Vec::new();
        let mut expense_breakdown = Vec::new();
        for (category_id, (kind, amount, count)) in by_category {
            let name = self
                .storage
                .categories
                .get(category_id)?
                .map(|c| c.name)
                .unwrap_or_else(|| category_id.to_string());
            let (target, total) = match kind {
                CategoryKind::Income => (&mut income_breakdown, total_income),
                CategoryKind::Expense => (&mut expense_breakdown, total_expense),
            };
            target.push(CategoryTotal {
                category_id,
                name,
                amount,
                count,
                percentage: share_of(amount, total),
            });
        }

        for breakdown in [&mut income_breakdown, &mut expense_breakdown] {
            breakdown.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));
        }

        Ok(TransactionStats {
            start_date,
            end_date,
            total_income,
            total_expense,
            balance: total_income - total_expense,
            income_breakdown,
            expense_breakdown,
            transaction_count: transactions.len(),
        })
    }

    fn category(&self, id: CategoryId) -> PlannerResult<Category> {
        self.storage
            .categories
            .get(id)?
            .ok_or_else(|| PlannerError::category_not_found(id.to_string()))
    }
}

/// `part` as a percentage of `total`, to two decimals; zero for an empty total
fn share_of(part: Money, total: Money) -> f64 {
    if !total.is_positive() {
        return 0.0;
    }
    let raw = part.cents() as f64 / total.cents() as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PlannerPaths;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        _temp_dir: TempDir,
        storage: Storage,
        salary: Category,
        food: Category,
        rent: Category,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let salary = Category::income("Salary");
        let food = Category::expense("Food");
        let rent = Category::expense("Rent");
        for category in [&salary, &food, &rent] {
            storage.categories.upsert(category.clone()).unwrap();
        }

        Fixture {
            _temp_dir: temp_dir,
            storage,
            salary,
            food,
            rent,
        }
    }

    fn record(
        service: &TransactionService,
        category: &Category,
        day: NaiveDate,
        units: i64,
    ) -> Transaction {
        service
            .create(CreateTransactionInput {
                date: day,
                amount: Money::from_units(units),
                category_id: category.id,
                description: None,
            })
            .unwrap()
    }

    #[test]
    fn test_create_takes_kind_from_category() {
        let fx = fixture();
        let service = TransactionService::new(&fx.storage);

        let txn = service
            .create(CreateTransactionInput {
                date: date(2025, 3, 3),
                amount: Money::from_units(250),
                category_id: fx.food.id,
                description: Some("  Market ".into()),
            })
            .unwrap();

        assert!(txn.is_expense());
        assert_eq!(txn.description, "Market");
        assert_eq!(fx.storage.transactions.count().unwrap(), 1);

        let income = record(&service, &fx.salary, date(2025, 3, 1), 5000);
        assert!(income.is_income());
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let fx = fixture();
        let service = TransactionService::new(&fx.storage);

        let zero = service.create(CreateTransactionInput {
            date: date(2025, 3, 3),
            amount: Money::zero(),
            category_id: fx.food.id,
            description: None,
        });
        assert!(zero.unwrap_err().is_validation());

        let orphan = service.create(CreateTransactionInput {
            date: date(2025, 3, 3),
            amount: Money::from_units(1),
            category_id: CategoryId::new(),
            description: None,
        });
        assert!(orphan.unwrap_err().is_not_found());
        assert_eq!(fx.storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_find_by_short_id() {
        let fx = fixture();
        let service = TransactionService::new(&fx.storage);
        let txn = record(&service, &fx.food, date(2025, 3, 3), 10);

        let short = txn.id.to_string();
        assert_eq!(service.find(&short).unwrap().unwrap().id, txn.id);
        let full = txn.id.as_uuid().to_string();
        assert_eq!(service.find(&full).unwrap().unwrap().id, txn.id);

        assert!(service.find("txn-").unwrap().is_none());
        let miss = if short.starts_with("txn-0") { "txn-1111" } else { "txn-0000" };
        assert!(service.require(miss).unwrap_err().is_not_found());
    }

    #[test]
    fn test_ambiguous_prefix_is_rejected() {
        let fx = fixture();
        let service = TransactionService::new(&fx.storage);
        for uuid in [
            "abcd0000-0000-4000-8000-000000000001",
            "abcd0000-0000-4000-8000-000000000002",
        ] {
            let mut txn = Transaction::new(&fx.food, date(2025, 3, 2), Money::from_units(1));
            txn.id = TransactionId::parse(uuid).unwrap();
            fx.storage.transactions.upsert(txn).unwrap();
        }

        assert!(service.find("txn-abcd0000").unwrap_err().is_validation());
        assert!(service
            .find("abcd0000-0000-4000-8000-000000000002")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_list_filters_sorts_and_pages() {
        let fx = fixture();
        let service = TransactionService::new(&fx.storage);
        record(&service, &fx.salary, date(2025, 3, 1), 5000);
        record(&service, &fx.food, date(2025, 3, 2), 30);
        record(&service, &fx.food, date(2025, 3, 20), 70);
        record(&service, &fx.rent, date(2025, 3, 5), 1500);
        record(&service, &fx.food, date(2025, 4, 2), 40);

        let expenses = service
            .list(&TransactionFilter::new().kind(CategoryKind::Expense))
            .unwrap();
        assert_eq!(expenses.total, 4);
        assert_eq!(expenses.items[0].date, date(2025, 4, 2));

        let march_food = service
            .list(
                &TransactionFilter::new()
                    .category(fx.food.id)
                    .date_range(Some(date(2025, 3, 1)), Some(date(2025, 3, 31)))
                    .sort_by(TransactionSort::Date, true),
            )
            .unwrap();
        assert_eq!(march_food.total, 2);
        assert_eq!(march_food.items[0].amount, Money::from_units(30));

        let largest = service
            .list(
                &TransactionFilter::new()
                    .sort_by(TransactionSort::Amount, false)
                    .page(2, 1),
            )
            .unwrap();
        assert_eq!(largest.total, 5);
        assert_eq!(largest.items.len(), 2);
        assert_eq!(largest.items[0].amount, Money::from_units(1500));
        assert_eq!(largest.items[1].amount, Money::from_units(70));
    }

    #[test]
    fn test_update_refiles_and_validates() {
        let fx = fixture();
        let service = TransactionService::new(&fx.storage);
        let txn = record(&service, &fx.food, date(2025, 3, 2), 30);

        let updated = service
            .update(
                txn.id,
                TransactionUpdate {
                    amount: Some(Money::from_units(45)),
                    category_id: Some(fx.salary.id),
                    description: Some("Refund".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated.is_income());
        assert_eq!(updated.amount, Money::from_units(45));
        assert_eq!(updated.date, date(2025, 3, 2));
        assert!(service.list_for_category(fx.food.id).unwrap().is_empty());

        let negative = service.update(
            txn.id,
            TransactionUpdate {
                amount: Some(Money::from_units(-5)),
                ..Default::default()
            },
        );
        assert!(negative.unwrap_err().is_validation());
        assert_eq!(
            service.get(txn.id).unwrap().unwrap().amount,
            Money::from_units(45)
        );

        assert!(service
            .update(TransactionId::new(), TransactionUpdate::default())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_delete() {
        let fx = fixture();
        let service = TransactionService::new(&fx.storage);
        let txn = record(&service, &fx.food, date(2025, 3, 2), 30);

        assert_eq!(service.delete(txn.id).unwrap().id, txn.id);
        assert!(service.get(txn.id).unwrap().is_none());
        assert!(service.delete(txn.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_statistics_breakdown() {
        let fx = fixture();
        let service = TransactionService::new(&fx.storage);
        record(&service, &fx.salary, date(2025, 3, 1), 5000);
        record(&service, &fx.food, date(2025, 3, 2), 300);
        record(&service, &fx.food, date(2025, 3, 9), 200);
        record(&service, &fx.rent, date(2025, 3, 5), 1500);
        record(&service, &fx.rent, date(2025, 4, 5), 1500);

        let stats = service
            .statistics(Some(date(2025, 3, 1)), Some(date(2025, 3, 31)))
            .unwrap();

        assert_eq!(stats.total_income, Money::from_units(5000));
        assert_eq!(stats.total_expense, Money::from_units(2000));
        assert_eq!(stats.balance, Money::from_units(3000));
        assert_eq!(stats.transaction_count, 4);

        assert_eq!(stats.income_breakdown.len(), 1);
        assert_eq!(stats.income_breakdown[0].percentage, 100.0);

        let expense = &stats.expense_breakdown;
        assert_eq!(expense[0].name, "Rent");
        assert_eq!(expense[0].percentage, 75.0);
        assert_eq!(expense[1].name, "Food");
        assert_eq!(expense[1].count, 2);
        assert_eq!(expense[1].percentage, 25.0);
    }

    #[test]
    fn test_statistics_without_transactions() {
        let fx = fixture();
        let service = TransactionService::new(&fx.storage);

        let stats = service.statistics(None, None).unwrap();
        assert_eq!(stats.total_income, Money::zero());
        assert_eq!(stats.balance, Money::zero());
        assert!(stats.expense_breakdown.is_empty());
    }

    #[test]
    fn test_share_rounds_to_two_decimals() {
        assert_eq!(share_of(Money::from_units(1), Money::from_units(3)), 33.33);
        assert_eq!(share_of(Money::from_units(1), Money::zero()), 0.0);
    }
}
