//! Budget service
//!
//! Persists submitted budget forms and builds read-only summaries of stored
//! budgets. A summary pairs the allocation state, derived the same way as in
//! the live calculator, with what the recorded transactions say about the
//! period: actual income and spending, and a spending projection while the
//! period is running.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::allocation::CalculatorView;
use crate::error::{PlannerError, PlannerResult};
use crate::form::BudgetForm;
use crate::models::{Budget, BudgetId, BudgetStatus, Category, Money};
use crate::storage::Storage;

use super::transaction::TransactionService;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// A stored budget together with its derived allocation state
#[derive(Debug, Clone)]
pub struct BudgetSummary {
    pub budget: Budget,
    pub income_categories: Vec<Category>,
    pub view: CalculatorView,
    pub status: BudgetStatus,
    pub actuals: BudgetActuals,
    /// Only while the period is running
    pub projection: Option<BudgetProjection>,
}

/// Recorded transactions dated inside the budget period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetActuals {
    pub income: Money,
    pub expense: Money,
    pub balance: Money,
    /// Expense as a share of the budget total, to two decimals
    pub spent_percentage: f64,
    /// Total minus expense; negative once overspent
    pub remaining: Money,
}

/// Spending extrapolated from the pace so far
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProjection {
    pub daily_expense: Money,
    pub projected_total: Money,
    /// Days so far, today included
    pub elapsed_days: i64,
    pub remaining_days: i64,
    pub total_days: i64,
    /// Total minus the projected spending
    pub projected_remaining: Money,
    pub projected_percentage: f64,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Submit a form and store the resulting budget
    ///
    /// Creates a new budget or updates the one the form was seeded from.
    pub fn save_form(&self, form: &BudgetForm) -> PlannerResult<Budget> {
        let budget = form.submit()?;

        if let Some(existing) = self.storage.budgets.find_by_name(&budget.name)? {
            if existing.id != budget.id {
                return Err(PlannerError::Duplicate {
                    entity_type: "Budget",
                    identifier: budget.name.clone(),
                });
            }
        }

        for id in budget
            .income_categories
            .iter()
            .chain(budget.expense_categories.iter())
        {
            if self.storage.categories.get(*id)?.is_none() {
                return Err(PlannerError::category_not_found(id.to_string()));
            }
        }

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        info!(
            budget = %budget.id,
            name = %budget.name,
            allocated = %budget.allocated(),
            total = %budget.total_amount,
            "Saved budget"
        );
        Ok(budget)
    }

    pub fn get(&self, id: BudgetId) -> PlannerResult<Option<Budget>> {
        self.storage.budgets.get(id)
    }

    /// Find a budget by name or ID string
    pub fn find(&self, identifier: &str) -> PlannerResult<Option<Budget>> {
        if let Some(budget) = self.storage.budgets.find_by_name(identifier)? {
            return Ok(Some(budget));
        }

        if let Ok(id) = identifier.trim().parse::<BudgetId>() {
            return self.storage.budgets.get(id);
        }

        Ok(None)
    }

    pub fn require(&self, identifier: &str) -> PlannerResult<Budget> {
        self.find(identifier)?
            .ok_or_else(|| PlannerError::budget_not_found(identifier))
    }

    pub fn list(&self) -> PlannerResult<Vec<Budget>> {
        self.storage.budgets.get_all()
    }

    /// Budgets whose period contains `date`
    pub fn active_on(&self, date: NaiveDate) -> PlannerResult<Vec<Budget>> {
        self.storage.budgets.get_active_on(date)
    }

    pub fn delete(&self, id: BudgetId) -> PlannerResult<Budget> {
        let budget = self
            .storage
            .budgets
            .get(id)?
            .ok_or_else(|| PlannerError::budget_not_found(id.to_string()))?;

        self.storage.budgets.delete(id)?;
        self.storage.budgets.save()?;

        info!(budget = %id, name = %budget.name, "Deleted budget");
        Ok(budget)
    }

    /// Open an edit session for a stored budget
    pub fn open_form(&self, budget: &Budget) -> PlannerResult<BudgetForm> {
        let categories = self.storage.categories.get_all()?;
        Ok(BudgetForm::from_budget(budget, &categories))
    }

    /// Summary of a stored budget as of today
    pub fn summary(&self, budget: &Budget) -> PlannerResult<BudgetSummary> {
        self.summary_on(budget, Local::now().date_naive())
    }

    /// Summary of a stored budget as of `today`
    pub fn summary_on(&self, budget: &Budget, today: NaiveDate) -> PlannerResult<BudgetSummary> {
        let form = self.open_form(budget)?;
        let view = CalculatorView::build(&form.props(), false);

        let mut income_categories = Vec::with_capacity(budget.income_categories.len());
        for id in &budget.income_categories {
            if let Some(category) = self.storage.categories.get(*id)? {
                income_categories.push(category);
            }
        }

        let stats = TransactionService::new(self.storage)
            .statistics(Some(budget.start_date), Some(budget.end_date))?;
        let actuals = BudgetActuals {
            income: stats.total_income,
            expense: stats.total_expense,
            balance: stats.balance,
            spent_percentage: percent_of(stats.total_expense, budget.total_amount),
            remaining: budget.total_amount - stats.total_expense,
        };

        let status = budget.status_on(today);
        let projection = match status {
            BudgetStatus::Active => Some(project(budget, stats.total_expense, today)),
            BudgetStatus::Upcoming | BudgetStatus::Completed => None,
        };

        Ok(BudgetSummary {
            budget: budget.clone(),
            income_categories,
            view,
            status,
            actuals,
            projection,
        })
    }
}

/// Extrapolate spending to the end of the period at the average daily pace
///
/// `today` must fall inside the period.
fn project(budget: &Budget, expense: Money, today: NaiveDate) -> BudgetProjection {
    let total_days = budget.total_days();
    let elapsed_days = (today - budget.start_date).num_days() + 1;
    let remaining_days = (budget.end_date - today).num_days();

    let daily_expense = Money::from_cents(div_round(i128::from(expense.cents()), elapsed_days));
    let projected_total = Money::from_cents(div_round(
        i128::from(expense.cents()) * i128::from(total_days),
        elapsed_days,
    ));

    BudgetProjection {
        daily_expense,
        projected_total,
        elapsed_days,
        remaining_days,
        total_days,
        projected_remaining: budget.total_amount - projected_total,
        projected_percentage: percent_of(projected_total, budget.total_amount),
    }
}

/// Nearest-cent division, clamped into `i64`
fn div_round(numerator: i128, denominator: i64) -> i64 {
    let denominator = i128::from(denominator.max(1));
    let rounded = (numerator + denominator / 2).div_euclid(denominator);
    rounded.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

fn percent_of(part: Money, total: Money) -> f64 {
    if !total.is_positive() {
        return 0.0;
    }
    let raw = part.cents() as f64 / total.cents() as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::AllocationStatus;
    use crate::config::paths::PlannerPaths;
    use crate::models::{CategoryKind, Money};
    use crate::services::{CategoryService, CreateTransactionInput};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn setup_form(storage: &Storage, name: &str) -> (BudgetForm, Vec<Category>) {
        let categories = CategoryService::new(storage);
        let salary = categories
            .find("Salary")
            .unwrap()
            .unwrap_or_else(|| categories.create("Salary", CategoryKind::Income, None).unwrap());
        let food = categories
            .find("Food")
            .unwrap()
            .unwrap_or_else(|| categories.create("Food", CategoryKind::Expense, None).unwrap());
        let rent = categories
            .find("Rent")
            .unwrap()
            .unwrap_or_else(|| categories.create("Rent", CategoryKind::Expense, None).unwrap());

        let mut form = BudgetForm::for_period(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), 30);
        form.name = name.into();
        form.total_amount = "10000".into();
        form.income_categories = vec![salary.id];
        form.select_expense_categories(vec![food.clone(), rent.clone()]);
        (form, vec![salary, food, rent])
    }

    #[test]
    fn test_save_and_find() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let (mut form, cats) = setup_form(&storage, "March");
        form.handle_allocation_change(cats[1].id, "3000".into());

        let budget = service.save_form(&form).unwrap();
        assert_eq!(budget.allocation(cats[1].id), Money::from_units(3000));

        let found = service.require("march").unwrap();
        assert_eq!(found.id, budget.id);
        assert_eq!(service.list().unwrap().len(), 1);
        assert!(service.require("April").unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let (form, _) = setup_form(&storage, "March");
        service.save_form(&form).unwrap();

        let (again, _) = setup_form(&storage, "MARCH");
        assert!(matches!(
            service.save_form(&again),
            Err(PlannerError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_update_through_form() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let (form, cats) = setup_form(&storage, "March");
        let budget = service.save_form(&form).unwrap();

        let mut edit = service.open_form(&budget).unwrap();
        edit.handle_allocation_change(cats[2].id, "4500".into());
        let updated = service.save_form(&edit).unwrap();

        assert_eq!(updated.id, budget.id);
        assert_eq!(service.list().unwrap().len(), 1);
        assert_eq!(
            service.get(budget.id).unwrap().unwrap().allocation(cats[2].id),
            Money::from_units(4500)
        );
    }

    #[test]
    fn test_invalid_form_is_validation_error() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let (mut form, cats) = setup_form(&storage, "March");
        form.handle_allocation_change(cats[1].id, "99999".into());

        assert!(service.save_form(&form).unwrap_err().is_validation());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_summary() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let (mut form, cats) = setup_form(&storage, "March");
        form.handle_allocation_change(cats[1].id, "3000".into());
        form.handle_allocation_change(cats[2].id, "2000".into());
        let budget = service.save_form(&form).unwrap();

        let summary = service.summary(&budget).unwrap();
        assert_eq!(summary.income_categories.len(), 1);
        assert_eq!(summary.view.rows.len(), 2);
        assert_eq!(summary.view.metrics.days, 30);
        assert_eq!(
            summary.view.status(),
            AllocationStatus::Unallocated(Money::from_units(5000))
        );
    }

    fn record(storage: &Storage, category: &Category, day: u32, units: i64) {
        TransactionService::new(storage)
            .create(CreateTransactionInput {
                date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
                amount: Money::from_units(units),
                category_id: category.id,
                description: None,
            })
            .unwrap();
    }

    #[test]
    fn test_summary_projects_spending_while_active() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let (form, cats) = setup_form(&storage, "March");
        let budget = service.save_form(&form).unwrap();

        record(&storage, &cats[0], 1, 5000);
        record(&storage, &cats[1], 2, 300);
        record(&storage, &cats[2], 9, 200);

        // The period runs 2025-03-01 to 2025-03-31
        let summary = service
            .summary_on(&budget, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
            .unwrap();

        assert_eq!(summary.status, BudgetStatus::Active);
        assert_eq!(summary.actuals.income, Money::from_units(5000));
        assert_eq!(summary.actuals.expense, Money::from_units(500));
        assert_eq!(summary.actuals.balance, Money::from_units(4500));
        assert_eq!(summary.actuals.spent_percentage, 5.0);
        assert_eq!(summary.actuals.remaining, Money::from_units(9500));

        let projection = summary.projection.unwrap();
        assert_eq!(projection.elapsed_days, 10);
        assert_eq!(projection.remaining_days, 21);
        assert_eq!(projection.total_days, 31);
        assert_eq!(projection.daily_expense, Money::from_units(50));
        assert_eq!(projection.projected_total, Money::from_units(1550));
        assert_eq!(projection.projected_remaining, Money::from_units(8450));
        assert_eq!(projection.projected_percentage, 15.5);
    }

    #[test]
    fn test_summary_outside_period_has_no_projection() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let (form, cats) = setup_form(&storage, "March");
        let budget = service.save_form(&form).unwrap();
        record(&storage, &cats[1], 31, 999);

        let before = service
            .summary_on(&budget, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())
            .unwrap();
        assert_eq!(before.status, BudgetStatus::Upcoming);
        assert!(before.projection.is_none());

        let after = service
            .summary_on(&budget, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap())
            .unwrap();
        assert_eq!(after.status, BudgetStatus::Completed);
        assert!(after.projection.is_none());
        assert_eq!(after.actuals.expense, Money::from_units(999));
    }

    #[test]
    fn test_projection_rounds_to_the_cent() {
        let budget = Budget::new(
            "Week",
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            Money::zero(),
        );
        let projection = project(
            &budget,
            Money::from_cents(100),
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
        );

        assert_eq!(projection.daily_expense, Money::from_cents(33));
        assert_eq!(projection.projected_total, Money::from_cents(233));
        assert_eq!(projection.projected_percentage, 0.0);
    }

    #[test]
    fn test_active_on_and_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let (form, _) = setup_form(&storage, "March");
        let budget = service.save_form(&form).unwrap();

        assert_eq!(
            service
                .active_on(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap())
                .unwrap()
                .len(),
            1
        );
        assert!(service
            .active_on(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
            .unwrap()
            .is_empty());

        service.delete(budget.id).unwrap();
        assert!(service.get(budget.id).unwrap().is_none());
    }
}
