//! Savings goal calculator
//!
//! How much has to be put aside each month to reach a target amount by a
//! target date.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::error::{PlannerError, PlannerResult};
use crate::models::Money;

/// Result of a savings calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavingsPlan {
    pub target_amount: Money,
    pub current_savings: Money,
    pub target_date: NaiveDate,
    pub amount_to_save: Money,
    pub months_remaining: u32,
    pub required_monthly_savings: Money,
    pub goal_reached: bool,
}

/// Work out the monthly savings needed to reach `target_amount` by `target_date`
///
/// Months are counted as whole calendar months from `today`, plus one for
/// any leftover days; a target inside the current month counts as one month.
/// The monthly amount is rounded up to the cent.
pub fn required_savings(
    target_amount: Money,
    target_date: NaiveDate,
    current_savings: Money,
    today: NaiveDate,
) -> PlannerResult<SavingsPlan> {
    if !target_amount.is_positive() {
        return Err(PlannerError::Validation(
            "Target amount must be positive".into(),
        ));
    }
    if current_savings.is_negative() {
        return Err(PlannerError::Validation(
            "Current savings cannot be negative".into(),
        ));
    }
    if target_date <= today {
        return Err(PlannerError::Validation(
            "Target date must be in the future".into(),
        ));
    }

    if current_savings >= target_amount {
        return Ok(SavingsPlan {
            target_amount,
            current_savings,
            target_date,
            amount_to_save: Money::zero(),
            months_remaining: 0,
            required_monthly_savings: Money::zero(),
            goal_reached: true,
        });
    }

    let amount_to_save = target_amount - current_savings;
    let months_remaining = months_until(today, target_date);
    let months = i64::from(months_remaining);
    let required = amount_to_save.cents().saturating_add(months - 1) / months;

    Ok(SavingsPlan {
        target_amount,
        current_savings,
        target_date,
        amount_to_save,
        months_remaining,
        required_monthly_savings: Money::from_cents(required),
        goal_reached: false,
    })
}

/// Whole months from `from` to `to`, rounded up; at least one
fn months_until(from: NaiveDate, to: NaiveDate) -> u32 {
    let span = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    let mut whole = span.max(0) as u32;

    while whole > 0 && add_months(from, whole) > to {
        whole -= 1;
    }

    if whole == 0 || add_months(from, whole) < to {
        whole + 1
    } else {
        whole
    }
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_exact_months() {
        let plan = required_savings(
            Money::from_units(12_000),
            date(2026, 1, 15),
            Money::zero(),
            date(2025, 1, 15),
        )
        .unwrap();

        assert_eq!(plan.months_remaining, 12);
        assert_eq!(plan.amount_to_save, Money::from_units(12_000));
        assert_eq!(plan.required_monthly_savings, Money::from_units(1000));
        assert!(!plan.goal_reached);
    }

    #[test]
    fn test_leftover_days_add_a_month() {
        let plan = required_savings(
            Money::from_units(10_000),
            date(2025, 3, 20),
            Money::from_units(500),
            date(2025, 1, 15),
        )
        .unwrap();

        assert_eq!(plan.months_remaining, 3);
        assert_eq!(plan.amount_to_save, Money::from_units(9500));
        // 9500 / 3 = 3166.666... rounded up
        assert_eq!(plan.required_monthly_savings, Money::from_cents(316_667));
    }

    #[test]
    fn test_same_month_counts_as_one() {
        let plan = required_savings(
            Money::from_units(300),
            date(2025, 1, 20),
            Money::zero(),
            date(2025, 1, 15),
        )
        .unwrap();
        assert_eq!(plan.months_remaining, 1);
        assert_eq!(plan.required_monthly_savings, Money::from_units(300));
    }

    #[test]
    fn test_month_end_clamping() {
        assert_eq!(months_until(date(2025, 1, 31), date(2025, 2, 28)), 1);
        assert_eq!(months_until(date(2025, 1, 31), date(2025, 3, 1)), 2);
        assert_eq!(months_until(date(2025, 1, 15), date(2025, 2, 14)), 1);
    }

    #[test]
    fn test_goal_already_reached() {
        let plan = required_savings(
            Money::from_units(500),
            date(2025, 2, 15),
            Money::from_units(600),
            date(2025, 1, 15),
        )
        .unwrap();

        assert!(plan.goal_reached);
        assert_eq!(plan.months_remaining, 0);
        assert_eq!(plan.required_monthly_savings, Money::zero());
    }

    #[test]
    fn test_validation() {
        let today = date(2025, 1, 15);
        let future = date(2025, 6, 1);

        assert!(required_savings(Money::zero(), future, Money::zero(), today)
            .unwrap_err()
            .is_validation());
        assert!(
            required_savings(Money::from_units(10), future, Money::from_units(-1), today)
                .unwrap_err()
                .is_validation()
        );
        assert!(
            required_savings(Money::from_units(10), today, Money::zero(), today)
                .unwrap_err()
                .is_validation()
        );
    }
}
