//! Budget allocation calculator
//!
//! The calculator distributes a budget's total amount across its expense
//! categories. It is a controlled component: the owner (see [`crate::form`])
//! holds the authoritative [`AllocationMap`] and hands it down through
//! [`CalculatorProps`]; every edit is reported back through an
//! [`AllocationSink`] and only becomes visible once the owner applies it.
//!
//! - [`reconcile`]: unallocated remainder and percentages, derived on every read
//! - [`format`]: currency formatting and per-day / per-month metrics
//! - [`calculator`]: the edit surface (field, stepper, slider) and auto-allocation
//! - [`view`]: the read model rendered by the CLI and the TUI

pub mod calculator;
pub mod format;
pub mod reconcile;
pub mod view;

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Category, CategoryId, Money};

pub use calculator::AllocationCalculator;
pub use format::{BudgetMetrics, CurrencyFormat};
pub use reconcile::{reconcile, AllocationStatus, Reconciliation};
pub use view::{CalculatorView, CategoryRow};

/// Raw allocation text per expense category
///
/// Values are kept exactly as typed so a half-finished entry ("12.") survives
/// a round trip through the owner. Anything unparseable counts as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationMap(BTreeMap<CategoryId, String>);

impl AllocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw text stored for a category
    pub fn get(&self, category_id: CategoryId) -> Option<&str> {
        self.0.get(&category_id).map(String::as_str)
    }

    /// Parsed amount for a category; missing or invalid entries are zero
    pub fn amount(&self, category_id: CategoryId) -> Money {
        self.get(category_id)
            .map(Money::parse_lenient)
            .unwrap_or_default()
    }

    pub fn set(&mut self, category_id: CategoryId, raw: impl Into<String>) {
        self.0.insert(category_id, raw.into());
    }

    pub fn contains(&self, category_id: CategoryId) -> bool {
        self.0.contains_key(&category_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &str)> {
        self.0.iter().map(|(id, raw)| (*id, raw.as_str()))
    }

    /// Sum of every parsed entry
    pub fn total_allocated(&self) -> Money {
        self.0.values().map(|raw| Money::parse_lenient(raw)).sum()
    }

    /// Drop entries whose category is not in `keep`
    pub fn retain_categories(&mut self, keep: &[CategoryId]) {
        self.0.retain(|id, _| keep.contains(id));
    }
}

impl FromIterator<(CategoryId, String)> for AllocationMap {
    fn from_iter<I: IntoIterator<Item = (CategoryId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One requested write to the owner's allocation map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationChange {
    pub category_id: CategoryId,
    pub amount: String,
}

impl AllocationChange {
    pub fn new(category_id: CategoryId, amount: impl Into<String>) -> Self {
        Self {
            category_id,
            amount: amount.into(),
        }
    }
}

/// The calculator's only mutation channel back to its owner
///
/// Implemented for plain closures and for channel senders, so an owner can
/// either apply changes in place or drain them from its event loop.
pub trait AllocationSink: Send + Sync + 'static {
    fn on_allocation_change(&self, category_id: CategoryId, amount: String);
}

impl<F> AllocationSink for F
where
    F: Fn(CategoryId, String) + Send + Sync + 'static,
{
    fn on_allocation_change(&self, category_id: CategoryId, amount: String) {
        self(category_id, amount)
    }
}

impl AllocationSink for tokio::sync::mpsc::UnboundedSender<AllocationChange> {
    fn on_allocation_change(&self, category_id: CategoryId, amount: String) {
        // A closed receiver means the owner is gone; the write has nowhere to land.
        let _ = self.send(AllocationChange::new(category_id, amount));
    }
}

/// Tuning knobs for the edit surface and the auto-allocator
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorSettings {
    /// Amount added or removed by one stepper press
    pub stepper_increment: Money,
    /// Slider granularity in percent
    pub slider_step: f64,
    /// Pacing delay before auto-allocation writes
    pub auto_allocate_delay: Duration,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            stepper_increment: Money::from_units(1000),
            slider_step: 0.1,
            auto_allocate_delay: Duration::from_millis(500),
        }
    }
}

/// Read-only inputs handed down by the owner on every render
#[derive(Debug, Clone, Copy)]
pub struct CalculatorProps<'a> {
    /// Raw total text; may be blank or invalid
    pub total_amount: &'a str,
    pub expense_categories: &'a [Category],
    pub expense_allocations: &'a AllocationMap,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl<'a> CalculatorProps<'a> {
    pub fn new(
        total_amount: &'a str,
        expense_categories: &'a [Category],
        expense_allocations: &'a AllocationMap,
    ) -> Self {
        Self {
            total_amount,
            expense_categories,
            expense_allocations,
            start_date: None,
            end_date: None,
        }
    }

    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Parsed total; invalid text is zero
    pub fn total(&self) -> Money {
        Money::parse_lenient(self.total_amount)
    }
}
