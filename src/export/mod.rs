//! Export module for Budget Planner
//!
//! Exports one budget's allocation breakdown:
//! - CSV: one row per expense category (spreadsheet-compatible)
//! - JSON: machine-readable snapshot with schema version
//! - YAML: human-readable snapshot

pub mod csv;
pub mod json;
pub mod yaml;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

pub use self::csv::export_budget_csv;
pub use json::{export_budget_json, AllocationLine, BudgetExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_budget_yaml;

use crate::error::{PlannerError, PlannerResult};
use crate::services::BudgetSummary;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

impl FromStr for ExportFormat {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(PlannerError::Export(format!(
                "Unknown format '{}', expected csv, json or yaml",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Export a budget in the requested format
pub fn export_budget<W: Write>(
    summary: &BudgetSummary,
    format: ExportFormat,
    writer: &mut W,
) -> PlannerResult<()> {
    match format {
        ExportFormat::Csv => export_budget_csv(summary, writer),
        ExportFormat::Json => export_budget_json(summary, writer),
        ExportFormat::Yaml => export_budget_yaml(summary, writer),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::allocation::{AllocationMap, CalculatorProps, CalculatorView};
    use crate::models::{Budget, Category, Money};
    use crate::services::budget::BudgetActuals;
    use chrono::NaiveDate;

    pub(crate) fn sample_summary() -> BudgetSummary {
        let salary = Category::income("Salary");
        let cats = vec![Category::expense("Food"), Category::expense("Rent")];

        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let mut budget = Budget::new("March", start, end, Money::from_units(10_000));
        budget.income_categories.push(salary.id);
        budget.expense_categories = cats.iter().map(|c| c.id).collect();
        budget.expense_allocations.insert(cats[0].id, Money::from_units(3000));
        budget.expense_allocations.insert(cats[1].id, Money::from_units(2000));

        let mut map = AllocationMap::new();
        map.set(cats[0].id, "3000");
        map.set(cats[1].id, "2000");
        let props =
            CalculatorProps::new("10000", &cats, &map).with_dates(Some(start), Some(end));

        BudgetSummary {
            status: budget.status_on(end + chrono::Duration::days(1)),
            budget,
            income_categories: vec![salary],
            view: CalculatorView::build(&props, false),
            actuals: BudgetActuals {
                income: Money::default(),
                expense: Money::default(),
                balance: Money::default(),
                spent_percentage: 0.0,
                remaining: Money::from_units(10_000),
            },
            projection: None,
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("yml".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_dispatch() {
        let summary = sample_summary();
        let mut buffer = Vec::new();
        export_budget(&summary, ExportFormat::Json, &mut buffer).unwrap();
        assert!(String::from_utf8(buffer).unwrap().contains("\"name\": \"March\""));
    }
}
