//! Budget display formatting
//!
//! The calculator renderer here is shared by `budget show` and the commands
//! that edit allocations, so both print the same summary cards and rows.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::allocation::{AllocationStatus, CalculatorView, CurrencyFormat};
use crate::models::Budget;
use crate::services::BudgetSummary;

const BAR_WIDTH: usize = 20;

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Allocated")]
    allocated: String,
    #[tabled(rename = "Unallocated")]
    unallocated: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format budgets as a table
pub fn format_budget_list(budgets: &[Budget], currency: &CurrencyFormat) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n\nCreate one with 'budget budget create'.".to_string();
    }

    let rows = budgets.iter().map(|b| BudgetRow {
        name: b.name.clone(),
        period: format!("{} → {}", b.start_date, b.end_date),
        total: currency.format(b.total_amount),
        allocated: currency.format(b.allocated()),
        unallocated: currency.format(b.unallocated()),
        id: b.id.to_string(),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Format the calculator: summary cards, status, period analysis and rows
pub fn format_calculator(view: &CalculatorView, currency: &CurrencyFormat) -> String {
    let reconciliation = &view.reconciliation;
    let mut output = String::new();

    output.push_str(&format!(
        "  Total:        {}\n",
        currency.format(reconciliation.total)
    ));
    output.push_str(&format!(
        "  Allocated:    {} ({})\n",
        currency.format(reconciliation.allocated),
        currency.format_percent(reconciliation.allocated_percentage())
    ));
    output.push_str(&format!(
        "  Unallocated:  {}\n",
        currency.format(reconciliation.unallocated)
    ));

    match view.status() {
        AllocationStatus::OverAllocated(excess) => output.push_str(&format!(
            "\n  ⚠ Over-allocated by {}\n",
            currency.format(excess)
        )),
        AllocationStatus::Unallocated(rest) if reconciliation.shows_unallocated_notice() => {
            output.push_str(&format!(
                "\n  ℹ {} still to allocate\n",
                currency.format(rest)
            ))
        }
        _ => {}
    }

    if view.metrics.days > 0 {
        output.push_str(&format!(
            "\n  Period:       {} days\n",
            view.metrics.days
        ));
        output.push_str(&format!(
            "  Per day:      {}\n",
            currency.format(view.metrics.daily_amount)
        ));
        output.push_str(&format!(
            "  Per month:    {}\n",
            currency.format(view.metrics.monthly_average)
        ));
    }

    if view.rows.is_empty() {
        output.push_str("\n  No expense categories selected.\n");
        return output;
    }

    let name_width = view
        .rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    output.push('\n');
    for row in &view.rows {
        output.push_str(&format!(
            "  {:<width$}  {:>14}  {:>6}  {}\n",
            row.name,
            currency.format(row.amount),
            currency.format_percent(row.percentage),
            percentage_bar(row.percentage),
            width = name_width
        ));
    }

    output
}

/// Format a stored budget with its calculator summary
pub fn format_budget_details(summary: &BudgetSummary, currency: &CurrencyFormat) -> String {
    let budget = &summary.budget;
    let mut output = String::new();

    output.push_str(&format!("Budget: {}\n", budget.name));
    output.push_str(&format!("  ID:      {}\n", budget.id));
    output.push_str(&format!(
        "  Period:  {} → {}\n",
        budget.start_date, budget.end_date
    ));
    if !budget.description.is_empty() {
        output.push_str(&format!("  Notes:   {}\n", budget.description));
    }
    if !summary.income_categories.is_empty() {
        let names: Vec<_> = summary
            .income_categories
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        output.push_str(&format!("  Income:  {}\n", names.join(", ")));
    }

    output.push_str(&format!("  Status:  {}\n", summary.status));

    output.push('\n');
    output.push_str(&format_calculator(&summary.view, currency));

    let actuals = &summary.actuals;
    output.push_str("\n  Recorded in period\n");
    output.push_str(&format!(
        "  Income:       {}\n",
        currency.format(actuals.income)
    ));
    output.push_str(&format!(
        "  Spent:        {} ({})\n",
        currency.format(actuals.expense),
        currency.format_percent(actuals.spent_percentage)
    ));
    output.push_str(&format!(
        "  Remaining:    {}\n",
        currency.format(actuals.remaining)
    ));

    if let Some(projection) = &summary.projection {
        output.push_str(&format!(
            "\n  Day {} of {}, {} to go\n",
            projection.elapsed_days, projection.total_days, projection.remaining_days
        ));
        output.push_str(&format!(
            "  Spending/day: {}\n",
            currency.format(projection.daily_expense)
        ));
        output.push_str(&format!(
            "  Projected:    {} ({})\n",
            currency.format(projection.projected_total),
            currency.format_percent(projection.projected_percentage)
        ));
        if projection.projected_remaining.is_negative() {
            output.push_str(&format!(
                "  ⚠ On pace to overspend by {}\n",
                currency.format(-projection.projected_remaining)
            ));
        }
    }

    output
}

pub(crate) fn percentage_bar(percentage: f64) -> String {
    let fraction = if percentage.is_finite() {
        (percentage / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::{AllocationMap, CalculatorProps};
    use crate::models::{Category, Money};
    use chrono::NaiveDate;

    fn plain() -> CurrencyFormat {
        CurrencyFormat::new("₽".into(), " ".into())
    }

    #[test]
    fn test_percentage_bar() {
        assert_eq!(percentage_bar(0.0), "░".repeat(20));
        assert_eq!(percentage_bar(50.0), format!("{}{}", "█".repeat(10), "░".repeat(10)));
        assert_eq!(percentage_bar(250.0), "█".repeat(20));
        assert_eq!(percentage_bar(f64::NAN), "░".repeat(20));
    }

    #[test]
    fn test_format_calculator() {
        let cats = vec![Category::expense("Food"), Category::expense("Rent")];
        let mut map = AllocationMap::new();
        map.set(cats[0].id, "3000");
        map.set(cats[1].id, "2000");

        let props = CalculatorProps::new("10000", &cats, &map).with_dates(
            NaiveDate::from_ymd_opt(2025, 3, 1),
            NaiveDate::from_ymd_opt(2025, 3, 31),
        );
        let output = format_calculator(&CalculatorView::build(&props, false), &plain());

        assert!(output.contains("Total:        10 000\u{a0}₽"));
        assert!(output.contains("(50.0%)"));
        assert!(output.contains("5 000\u{a0}₽ still to allocate"));
        assert!(output.contains("30 days"));
        assert!(output.contains("30.0%"));
    }

    #[test]
    fn test_format_over_allocated() {
        let cats = vec![Category::expense("Food")];
        let mut map = AllocationMap::new();
        map.set(cats[0].id, "1500");

        let props = CalculatorProps::new("1000", &cats, &map);
        let output = format_calculator(&CalculatorView::build(&props, false), &plain());

        assert!(output.contains("Over-allocated by 500\u{a0}₽"));
        assert!(!output.contains("Period:"));
    }

    #[test]
    fn test_format_budget_details_with_projection() {
        use crate::models::BudgetStatus;
        use crate::services::{BudgetActuals, BudgetProjection};

        let cats = vec![Category::expense("Food")];
        let map = AllocationMap::new();
        let props = CalculatorProps::new("1000", &cats, &map);
        let budget = Budget::new(
            "March",
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            Money::from_units(1000),
        );
        let summary = BudgetSummary {
            budget,
            income_categories: Vec::new(),
            view: CalculatorView::build(&props, false),
            status: BudgetStatus::Active,
            actuals: BudgetActuals {
                income: Money::zero(),
                expense: Money::from_units(500),
                balance: Money::from_units(-500),
                spent_percentage: 50.0,
                remaining: Money::from_units(500),
            },
            projection: Some(BudgetProjection {
                daily_expense: Money::from_units(50),
                projected_total: Money::from_units(1550),
                elapsed_days: 10,
                remaining_days: 21,
                total_days: 31,
                projected_remaining: Money::from_units(-550),
                projected_percentage: 155.0,
            }),
        };

        let output = format_budget_details(&summary, &plain());
        assert!(output.contains("Status:  active"));
        assert!(output.contains("Spent:        500\u{a0}₽ (50.0%)"));
        assert!(output.contains("Day 10 of 31, 21 to go"));
        assert!(output.contains("On pace to overspend by 550\u{a0}₽"));
    }

    #[test]
    fn test_format_budget_list() {
        assert!(format_budget_list(&[], &plain()).contains("No budgets found"));

        let budget = Budget::new(
            "March",
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            Money::from_units(10_000),
        );
        let output = format_budget_list(&[budget], &plain());
        assert!(output.contains("March"));
        assert!(output.contains("Unallocated"));
        assert!(output.contains("10 000\u{a0}₽"));
    }
}
