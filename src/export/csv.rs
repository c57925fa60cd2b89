//! CSV export of a budget's allocation breakdown

use serde::Serialize;
use std::io::Write;

use crate::error::{PlannerError, PlannerResult};
use crate::services::BudgetSummary;

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Percentage")]
    percentage: String,
}

/// Export one row per expense category, followed by an "Unallocated" row
pub fn export_budget_csv<W: Write>(summary: &BudgetSummary, writer: &mut W) -> PlannerResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let reconciliation = &summary.view.reconciliation;

    for row in &summary.view.rows {
        csv_writer
            .serialize(CsvRow {
                category: &row.name,
                amount: row.amount.to_string(),
                percentage: format!("{:.2}", row.percentage),
            })
            .map_err(|e| PlannerError::Export(e.to_string()))?;
    }

    let unallocated_share = if reconciliation.total.is_positive() {
        100.0 - reconciliation.allocated_percentage()
    } else {
        0.0
    };
    csv_writer
        .serialize(CsvRow {
            category: "Unallocated",
            amount: reconciliation.unallocated.to_string(),
            percentage: format!("{:.2}", unallocated_share),
        })
        .map_err(|e| PlannerError::Export(e.to_string()))?;

    csv_writer
        .flush()
        .map_err(|e| PlannerError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_summary;

    #[test]
    fn test_export_csv() {
        let summary = sample_summary();
        let mut buffer = Vec::new();
        export_budget_csv(&summary, &mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "Category,Amount,Percentage");
        assert_eq!(lines[1], "Food,3000.00,30.00");
        assert_eq!(lines[2], "Rent,2000.00,20.00");
        assert_eq!(lines[3], "Unallocated,5000.00,50.00");
    }

    #[test]
    fn test_export_csv_quotes_names() {
        let mut summary = sample_summary();
        summary.view.rows[0].name = "Food, drinks".to_string();

        let mut buffer = Vec::new();
        export_budget_csv(&summary, &mut buffer).unwrap();
        assert!(String::from_utf8(buffer).unwrap().contains("\"Food, drinks\""));
    }
}
