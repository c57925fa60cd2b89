//! YAML export of a budget's allocation breakdown

use std::io::Write;

use crate::error::{PlannerError, PlannerResult};
use crate::export::json::BudgetExport;
use crate::services::BudgetSummary;

/// Export a budget as YAML with a short header comment
pub fn export_budget_yaml<W: Write>(summary: &BudgetSummary, writer: &mut W) -> PlannerResult<()> {
    let export = BudgetExport::from_summary(summary);
    let export_err = |e: std::io::Error| PlannerError::Export(e.to_string());

    writeln!(writer, "# Budget Planner export: {}", export.name).map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| PlannerError::Export(e.to_string()))
}
