//! Budget form wizard
//!
//! [`BudgetForm`] owns everything the allocation calculator reads: the raw
//! total, the selected expense categories and the allocation map. It walks
//! the user through four steps and converts the raw text into a [`Budget`]
//! only on submit, which is also where numeric validation happens.

pub mod step;

use chrono::{Duration, NaiveDate};
use thiserror::Error;
use tracing::debug;

use crate::allocation::{AllocationChange, AllocationMap, CalculatorProps};
use crate::error::PlannerError;
use crate::models::{Budget, BudgetValidationError, Category, CategoryId, Money};

pub use step::FormStep;

/// Errors raised while moving through or submitting the form
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("Step '{0}' is incomplete")]
    StepIncomplete(FormStep),

    #[error("Missing {0}")]
    Missing(&'static str),

    #[error("Invalid total amount '{0}'")]
    InvalidTotal(String),

    #[error("Invalid allocation '{amount}' for {category}")]
    InvalidAllocation { category: String, amount: String },

    #[error("{0}")]
    Budget(#[from] BudgetValidationError),
}

impl From<FormError> for PlannerError {
    fn from(err: FormError) -> Self {
        PlannerError::Validation(err.to_string())
    }
}

/// In-progress budget, created fresh or seeded from a stored budget
#[derive(Debug, Clone, Default)]
pub struct BudgetForm {
    pub name: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Raw total text as typed
    pub total_amount: String,
    pub income_categories: Vec<CategoryId>,
    expense_categories: Vec<Category>,
    expense_allocations: AllocationMap,
    step: FormStep,
    original: Option<Budget>,
}

impl BudgetForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh form covering `period_days` from `start`
    pub fn for_period(start: NaiveDate, period_days: u32) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(start + Duration::days(i64::from(period_days))),
            ..Self::default()
        }
    }

    /// Seed an edit session from a stored budget
    ///
    /// Expense categories are resolved against `categories`; ids that no
    /// longer exist are dropped along with their allocations.
    pub fn from_budget(budget: &Budget, categories: &[Category]) -> Self {
        let expense_categories: Vec<Category> = budget
            .expense_categories
            .iter()
            .filter_map(|id| categories.iter().find(|c| c.id == *id).cloned())
            .collect();

        let expense_allocations = expense_categories
            .iter()
            .filter_map(|c| {
                budget
                    .expense_allocations
                    .get(&c.id)
                    .map(|amount| (c.id, amount.to_input_string()))
            })
            .collect();

        Self {
            name: budget.name.clone(),
            description: budget.description.clone(),
            start_date: Some(budget.start_date),
            end_date: Some(budget.end_date),
            total_amount: budget.total_amount.to_input_string(),
            income_categories: budget.income_categories.clone(),
            expense_categories,
            expense_allocations,
            step: FormStep::Info,
            original: Some(budget.clone()),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.original.is_some()
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    /// Jump straight to a step, e.g. when editing allocations only
    pub fn go_to(&mut self, step: FormStep) {
        self.step = step;
    }

    /// Advance when the current step is complete
    pub fn next(&mut self) -> Result<FormStep, FormError> {
        if !self.is_step_valid(self.step) {
            return Err(FormError::StepIncomplete(self.step));
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    pub fn back(&mut self) -> FormStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    pub fn is_step_valid(&self, step: FormStep) -> bool {
        match step {
            FormStep::Info => {
                !self.name.trim().is_empty() && self.start_date.is_some() && self.end_date.is_some()
            }
            FormStep::Incomes => {
                !self.income_categories.is_empty() && !self.total_amount.trim().is_empty()
            }
            FormStep::Expenses => !self.expense_categories.is_empty(),
            FormStep::Allocation => {
                self.expense_allocations.total_allocated() <= Money::parse_lenient(&self.total_amount)
            }
        }
    }

    pub fn expense_categories(&self) -> &[Category] {
        &self.expense_categories
    }

    pub fn expense_allocations(&self) -> &AllocationMap {
        &self.expense_allocations
    }

    /// Replace the expense selection
    ///
    /// Categories that stay selected keep their allocation, new ones start at
    /// "0" and deselected ones lose theirs.
    pub fn select_expense_categories(&mut self, categories: Vec<Category>) {
        let selected: Vec<CategoryId> = categories.iter().map(|c| c.id).collect();
        self.expense_allocations.retain_categories(&selected);
        for id in selected {
            if !self.expense_allocations.contains(id) {
                self.expense_allocations.set(id, "0");
            }
        }
        self.expense_categories = categories;
    }

    /// The calculator's mutation callback target
    ///
    /// Writes for categories that are not selected are ignored. Returns
    /// whether the write landed.
    pub fn handle_allocation_change(&mut self, category_id: CategoryId, raw: String) -> bool {
        if !self.expense_categories.iter().any(|c| c.id == category_id) {
            debug!(category = %category_id, "Ignoring allocation for unselected category");
            return false;
        }
        self.expense_allocations.set(category_id, raw);
        true
    }

    pub fn apply_change(&mut self, change: AllocationChange) -> bool {
        self.handle_allocation_change(change.category_id, change.amount)
    }

    /// Inputs for the calculator
    pub fn props(&self) -> CalculatorProps<'_> {
        CalculatorProps::new(
            &self.total_amount,
            &self.expense_categories,
            &self.expense_allocations,
        )
        .with_dates(self.start_date, self.end_date)
    }

    /// Convert the raw fields into a validated budget
    ///
    /// Blank allocation fields count as zero; anything else must parse.
    pub fn submit(&self) -> Result<Budget, FormError> {
        let start = self.start_date.ok_or(FormError::Missing("start date"))?;
        let end = self.end_date.ok_or(FormError::Missing("end date"))?;
        let total = Money::parse(&self.total_amount)
            .map_err(|_| FormError::InvalidTotal(self.total_amount.clone()))?;

        let mut budget = match &self.original {
            Some(original) => {
                let mut budget = original.clone();
                budget.name = self.name.trim().to_string();
                budget.start_date = start;
                budget.end_date = end;
                budget.total_amount = total;
                budget.touch();
                budget
            }
            None => Budget::new(self.name.trim(), start, end, total),
        };

        budget.description = self.description.trim().to_string();
        budget.income_categories = self.income_categories.clone();
        budget.expense_categories = self.expense_categories.iter().map(|c| c.id).collect();
        budget.expense_allocations.clear();

        for category in &self.expense_categories {
            let raw = self.expense_allocations.get(category.id).unwrap_or("");
            let amount = if raw.trim().is_empty() {
                Money::zero()
            } else {
                Money::parse(raw).map_err(|_| FormError::InvalidAllocation {
                    category: category.name.clone(),
                    amount: raw.to_string(),
                })?
            };
            budget.expense_allocations.insert(category.id, amount);
        }

        budget.validate()?;
        Ok(budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn filled_form() -> (BudgetForm, Vec<Category>) {
        let salary = Category::income("Salary");
        let food = Category::expense("Food");
        let rent = Category::expense("Rent");

        let mut form = BudgetForm::for_period(date(2025, 3, 1), 30);
        form.name = "March".into();
        form.total_amount = "10000".into();
        form.income_categories = vec![salary.id];
        form.select_expense_categories(vec![food.clone(), rent.clone()]);

        (form, vec![salary, food, rent])
    }

    #[test]
    fn test_for_period() {
        let form = BudgetForm::for_period(date(2025, 3, 1), 30);
        assert_eq!(form.end_date, Some(date(2025, 3, 31)));
        assert_eq!(form.step(), FormStep::Info);
    }

    #[test]
    fn test_step_validation() {
        let mut form = BudgetForm::new();
        assert_eq!(form.next(), Err(FormError::StepIncomplete(FormStep::Info)));

        form.name = "March".into();
        form.start_date = Some(date(2025, 3, 1));
        form.end_date = Some(date(2025, 3, 31));
        assert_eq!(form.next(), Ok(FormStep::Incomes));

        form.income_categories.push(CategoryId::new());
        assert!(form.next().is_err());
        form.total_amount = "1000".into();
        assert_eq!(form.next(), Ok(FormStep::Expenses));

        assert!(form.next().is_err());
        form.select_expense_categories(vec![Category::expense("Food")]);
        assert_eq!(form.next(), Ok(FormStep::Allocation));

        assert_eq!(form.back(), FormStep::Expenses);
    }

    #[test]
    fn test_allocation_step_rejects_over_allocation() {
        let (mut form, cats) = filled_form();
        form.go_to(FormStep::Allocation);
        assert!(form.is_step_valid(FormStep::Allocation));

        form.handle_allocation_change(cats[1].id, "10001".into());
        assert!(!form.is_step_valid(FormStep::Allocation));
    }

    #[test]
    fn test_select_keeps_existing_allocations() {
        let (mut form, cats) = filled_form();
        let (food, rent) = (cats[1].clone(), cats[2].clone());
        assert_eq!(form.expense_allocations().get(food.id), Some("0"));

        form.handle_allocation_change(food.id, "2500".into());
        let transport = Category::expense("Transport");
        form.select_expense_categories(vec![food.clone(), transport.clone()]);

        assert_eq!(form.expense_allocations().get(food.id), Some("2500"));
        assert_eq!(form.expense_allocations().get(transport.id), Some("0"));
        assert!(!form.expense_allocations().contains(rent.id));
    }

    #[test]
    fn test_ignores_unselected_category() {
        let (mut form, _) = filled_form();
        let stranger = CategoryId::new();
        assert!(!form.apply_change(AllocationChange::new(stranger, "5")));
        assert!(!form.expense_allocations().contains(stranger));
    }

    #[test]
    fn test_raw_text_is_preserved() {
        let (mut form, cats) = filled_form();
        form.handle_allocation_change(cats[1].id, "12.".into());
        assert_eq!(form.expense_allocations().get(cats[1].id), Some("12."));
        assert_eq!(form.props().expense_allocations.amount(cats[1].id), Money::from_units(12));
    }

    #[test]
    fn test_submit() {
        let (mut form, cats) = filled_form();
        form.handle_allocation_change(cats[1].id, "3000".into());
        form.handle_allocation_change(cats[2].id, "".into());

        let budget = form.submit().unwrap();
        assert_eq!(budget.name, "March");
        assert_eq!(budget.total_amount, Money::from_units(10_000));
        assert_eq!(budget.allocation(cats[1].id), Money::from_units(3000));
        assert_eq!(budget.allocation(cats[2].id), Money::zero());
        assert_eq!(budget.expense_categories, vec![cats[1].id, cats[2].id]);
    }

    #[test]
    fn test_submit_rejects_invalid_numbers() {
        let (mut form, cats) = filled_form();
        form.handle_allocation_change(cats[1].id, "12abc".into());
        assert!(matches!(
            form.submit(),
            Err(FormError::InvalidAllocation { .. })
        ));

        let (mut form, _) = filled_form();
        form.total_amount = "lots".into();
        assert_eq!(form.submit(), Err(FormError::InvalidTotal("lots".into())));
    }

    #[test]
    fn test_submit_rejects_over_allocation() {
        let (mut form, cats) = filled_form();
        form.handle_allocation_change(cats[1].id, "20000".into());
        assert!(matches!(
            form.submit(),
            Err(FormError::Budget(BudgetValidationError::OverAllocated { .. }))
        ));
    }

    #[test]
    fn test_edit_round_trip() {
        let (mut form, cats) = filled_form();
        form.handle_allocation_change(cats[1].id, "3000.50".into());
        let budget = form.submit().unwrap();

        let mut edit = BudgetForm::from_budget(&budget, &cats);
        assert!(edit.is_editing());
        assert_eq!(edit.total_amount, "10000");
        assert_eq!(edit.expense_allocations().get(cats[1].id), Some("3000.50"));

        edit.handle_allocation_change(cats[2].id, "1000".into());
        let updated = edit.submit().unwrap();
        assert_eq!(updated.id, budget.id);
        assert_eq!(updated.created_at, budget.created_at);
        assert_eq!(updated.allocation(cats[2].id), Money::from_units(1000));
    }

    #[test]
    fn test_from_budget_drops_missing_categories() {
        let (mut form, cats) = filled_form();
        form.handle_allocation_change(cats[2].id, "100".into());
        let budget = form.submit().unwrap();

        let remaining = vec![cats[0].clone(), cats[1].clone()];
        let edit = BudgetForm::from_budget(&budget, &remaining);
        assert_eq!(edit.expense_categories().len(), 1);
        assert!(!edit.expense_allocations().contains(cats[2].id));
    }
}
