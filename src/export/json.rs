//! JSON export of a budget's allocation breakdown

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{PlannerError, PlannerResult};
use crate::models::{BudgetId, CategoryId, Money};
use crate::services::BudgetSummary;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Self-contained snapshot of one budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub budget_id: BudgetId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_amount: Money,
    pub allocated: Money,
    pub unallocated: Money,
    pub days: i64,
    pub daily_amount: Money,
    pub monthly_average: Money,
    pub income_categories: Vec<String>,
    pub allocations: Vec<AllocationLine>,
}

/// One expense category in an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub category_id: CategoryId,
    pub category: String,
    pub amount: Money,
    pub percentage: f64,
}

impl BudgetExport {
    pub fn from_summary(summary: &BudgetSummary) -> Self {
        let budget = &summary.budget;
        let view = &summary.view;

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            budget_id: budget.id,
            name: budget.name.clone(),
            start_date: budget.start_date,
            end_date: budget.end_date,
            total_amount: view.reconciliation.total,
            allocated: view.reconciliation.allocated,
            unallocated: view.reconciliation.unallocated,
            days: view.metrics.days,
            daily_amount: view.metrics.daily_amount,
            monthly_average: view.metrics.monthly_average,
            income_categories: summary
                .income_categories
                .iter()
                .map(|c| c.name.clone())
                .collect(),
            allocations: view
                .rows
                .iter()
                .map(|row| AllocationLine {
                    category_id: row.id,
                    category: row.name.clone(),
                    amount: row.amount,
                    percentage: (row.percentage * 100.0).round() / 100.0,
                })
                .collect(),
        }
    }
}

/// Export a budget as pretty-printed JSON
pub fn export_budget_json<W: Write>(summary: &BudgetSummary, writer: &mut W) -> PlannerResult<()> {
    let export = BudgetExport::from_summary(summary);
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| PlannerError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| PlannerError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_summary;

    #[test]
    fn test_export_json() {
        let summary = sample_summary();
        let mut buffer = Vec::new();
        export_budget_json(&summary, &mut buffer).unwrap();

        let parsed: BudgetExport = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(parsed.name, "March");
        assert_eq!(parsed.allocations.len(), 2);
        assert_eq!(parsed.allocations[0].amount, Money::from_units(3000));
        assert_eq!(parsed.allocations[0].percentage, 30.0);
        assert_eq!(parsed.unallocated, Money::from_units(5000));
        assert_eq!(parsed.days, 30);
    }
}
