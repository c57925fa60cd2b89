//! Read model for rendering the calculator

use crate::models::{CategoryId, Money};

use super::format::BudgetMetrics;
use super::reconcile::{reconcile, AllocationStatus, Reconciliation};
use super::CalculatorProps;

/// One expense category row
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub name: String,
    pub color: Option<String>,
    /// Text exactly as the owner holds it (blank when unset)
    pub raw_amount: String,
    pub amount: Money,
    pub percentage: f64,
    pub can_decrement: bool,
}

/// Everything a front end needs to draw the calculator
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorView {
    pub reconciliation: Reconciliation,
    pub metrics: BudgetMetrics,
    pub rows: Vec<CategoryRow>,
    pub is_auto_allocating: bool,
    pub can_auto_allocate: bool,
}

impl CalculatorView {
    pub fn build(props: &CalculatorProps<'_>, is_auto_allocating: bool) -> Self {
        let reconciliation = reconcile(props.total_amount, props.expense_allocations);
        let metrics = BudgetMetrics::compute(reconciliation.total, props.start_date, props.end_date);

        let rows = props
            .expense_categories
            .iter()
            .map(|category| {
                let amount = props.expense_allocations.amount(category.id);
                CategoryRow {
                    id: category.id,
                    name: category.name.clone(),
                    color: category.color.clone(),
                    raw_amount: props
                        .expense_allocations
                        .get(category.id)
                        .unwrap_or_default()
                        .to_string(),
                    amount,
                    percentage: reconciliation.percentage(category.id),
                    can_decrement: amount.is_positive(),
                }
            })
            .collect();

        let can_auto_allocate = !is_auto_allocating
            && !props.expense_categories.is_empty()
            && reconciliation.total.is_positive();

        Self {
            reconciliation,
            metrics,
            rows,
            is_auto_allocating,
            can_auto_allocate,
        }
    }

    pub fn status(&self) -> AllocationStatus {
        self.reconciliation.status()
    }

    pub fn row(&self, category_id: CategoryId) -> Option<&CategoryRow> {
        self.rows.iter().find(|row| row.id == category_id)
    }
}
