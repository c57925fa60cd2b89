//! Currency formatting and period metrics

use chrono::NaiveDate;

use crate::models::Money;

/// Days used to turn a daily amount into a monthly average
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Whole-unit currency formatting with digit grouping
///
/// `10000` renders as `10 000 ₽` with the default settings: the amount is
/// rounded to a whole unit, grouped in thousands, and followed by the symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    symbol: String,
    group_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("₽".to_string(), "\u{a0}".to_string())
    }
}

impl CurrencyFormat {
    pub fn new(symbol: String, group_separator: String) -> Self {
        Self {
            symbol,
            group_separator,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Format an amount, rounded to the nearest whole unit
    pub fn format(&self, amount: Money) -> String {
        let rounded = amount.round_to_units();
        let digits = rounded.units().unsigned_abs().to_string();
        let grouped = group_digits(&digits, &self.group_separator);
        let sign = if rounded.is_negative() { "-" } else { "" };

        if self.symbol.is_empty() {
            format!("{}{}", sign, grouped)
        } else {
            format!("{}{}\u{a0}{}", sign, grouped, self.symbol)
        }
    }

    /// Format a percentage with one decimal place
    pub fn format_percent(&self, percent: f64) -> String {
        if percent.is_finite() {
            format!("{:.1}%", percent)
        } else {
            "0.0%".to_string()
        }
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

/// Per-day and per-month view of a budget period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetMetrics {
    pub days: i64,
    pub daily_amount: Money,
    pub monthly_average: Money,
}

impl BudgetMetrics {
    /// Metrics for a total spread over the given dates
    ///
    /// Missing dates, or a start equal to the end, yield zero days and zero
    /// amounts.
    pub fn compute(total: Money, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let days = days_between(start, end);
        let daily = daily_units(total, days);

        Self {
            days,
            daily_amount: Money::from_cents((daily * 100.0).round() as i64),
            monthly_average: Money::from_cents((daily * DAYS_PER_MONTH * 100.0).round() as i64),
        }
    }
}

/// Absolute whole-day distance between two dates, zero if either is missing
pub fn days_between(start: Option<NaiveDate>, end: Option<NaiveDate>) -> i64 {
    match (start, end) {
        (Some(start), Some(end)) => (end - start).num_days().abs(),
        _ => 0,
    }
}

fn daily_units(total: Money, days: i64) -> f64 {
    if days <= 0 {
        return 0.0;
    }
    total.as_f64() / days as f64
}
