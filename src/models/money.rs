//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Allocation inputs arrive as raw text, so this module also owns the
//! strict and lenient parsers used by the form and the calculator.
//!
//! Arithmetic saturates at the `i64` bounds: typed amounts are unbounded text,
//! and sums of them must never panic or wrap.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use budget_planner::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.units(), 10);
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole currency units
    ///
    /// # Examples
    /// ```
    /// use budget_planner::models::Money;
    /// assert_eq!(Money::from_units(1000).cents(), 100_000);
    /// ```
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(100))
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// The amount as a floating point number of units
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Convert a floating point unit amount, rounding to the nearest whole unit
    ///
    /// Non-finite input maps to zero.
    pub fn from_f64_rounded(units: f64) -> Self {
        if !units.is_finite() {
            return Self::zero();
        }
        Self::from_units(units.round() as i64)
    }

    /// Round to the nearest whole unit, halves away from zero
    pub const fn round_to_units(&self) -> Self {
        let whole = self.0 / 100;
        let rest = self.0 % 100;
        let whole = if rest >= 50 {
            whole.saturating_add(1)
        } else if rest <= -50 {
            whole.saturating_sub(1)
        } else {
            whole
        };
        Self(whole.saturating_mul(100))
    }

    /// Drop the cents portion (toward zero)
    pub const fn trunc_to_units(&self) -> Self {
        Self(self.units() * 100)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "10,5", "10", " 10 ".
    /// Digits beyond the second decimal place are dropped.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let (negative, body) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, trimmed.strip_prefix('+').unwrap_or(trimmed))
        };

        let body = body.replace(',', ".");
        let (whole, fraction) = match body.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (body.as_str(), ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction[..2].parse().map_err(|_| invalid())?,
        };

        let total = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -total } else { total }))
    }

    /// Parse an amount, treating anything unparseable (including blank input) as zero
    pub fn parse_lenient(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Render the amount the way an input field would hold it
    ///
    /// Whole amounts have no decimal part ("5000"); others keep two digits.
    pub fn to_input_string(&self) -> String {
        if self.cents_part() == 0 {
            self.units().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}.{:02}", self.units().abs(), self.cents_part())
        } else {
            write!(f, "{}.{:02}", self.units(), self.cents_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: '{}'", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
