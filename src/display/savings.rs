//! Savings plan formatting

use crate::allocation::CurrencyFormat;
use crate::services::SavingsPlan;

/// Format the result of a savings calculation
pub fn format_savings_plan(plan: &SavingsPlan, currency: &CurrencyFormat) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "  Target:          {} by {}\n",
        currency.format(plan.target_amount),
        plan.target_date
    ));
    output.push_str(&format!(
        "  Saved so far:    {}\n",
        currency.format(plan.current_savings)
    ));

    if plan.goal_reached {
        output.push_str("\n  Goal already reached or exceeded.\n");
        return output;
    }

    output.push_str(&format!(
        "  Still to save:   {}\n",
        currency.format(plan.amount_to_save)
    ));
    output.push_str(&format!("  Months left:     {}\n", plan.months_remaining));
    // Whole-unit formatting would hide the rounded-up cents
    output.push_str(&format!(
        "  Save per month:  {} {}\n",
        plan.required_monthly_savings,
        currency.symbol()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn plan(goal_reached: bool) -> SavingsPlan {
        SavingsPlan {
            target_amount: Money::from_units(10_000),
            current_savings: Money::from_units(500),
            target_date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
            amount_to_save: Money::from_units(9500),
            months_remaining: 3,
            required_monthly_savings: Money::from_cents(316_667),
            goal_reached,
        }
    }

    #[test]
    fn test_format_plan() {
        let output = format_savings_plan(&plan(false), &CurrencyFormat::default());
        assert!(output.contains("Months left:     3"));
        assert!(output.contains("3166.67 ₽"));
    }

    #[test]
    fn test_format_goal_reached() {
        let output = format_savings_plan(&plan(true), &CurrencyFormat::default());
        assert!(output.contains("Goal already reached"));
        assert!(!output.contains("Months left"));
    }
}
