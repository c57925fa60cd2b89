//! Allocation reconciliation
//!
//! Derives the allocated sum, the unallocated remainder and per-category
//! percentages from the raw total and allocation map. Nothing here is stored;
//! every render recomputes it from the owner's current values.

use std::collections::BTreeMap;

use crate::models::{CategoryId, Money};

use super::AllocationMap;

/// Derived allocation state for one render
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Parsed total (zero when blank or invalid)
    pub total: Money,
    /// Sum of parsed allocations
    pub allocated: Money,
    /// `total - allocated`; negative when over-allocated
    pub unallocated: Money,
    /// Share of the total per category, in percent
    pub percentages: BTreeMap<CategoryId, f64>,
}

/// Headline state shown above the category rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationStatus {
    /// Nothing left over and nothing overspent
    Balanced,
    /// Money still waiting to be assigned
    Unallocated(Money),
    /// Allocations exceed the total by this much
    OverAllocated(Money),
}

/// Reconcile a raw total against the current allocations
///
/// Percentages are zero for every category while the total is not positive.
pub fn reconcile(total_amount: &str, allocations: &AllocationMap) -> Reconciliation {
    let total = Money::parse_lenient(total_amount);
    let allocated = allocations.total_allocated();

    let percentages = allocations
        .iter()
        .map(|(id, raw)| (id, percentage_of(Money::parse_lenient(raw), total)))
        .collect();

    Reconciliation {
        total,
        allocated,
        unallocated: total - allocated,
        percentages,
    }
}

/// `amount / total * 100`, or zero when the total is not positive
pub fn percentage_of(amount: Money, total: Money) -> f64 {
    if !total.is_positive() {
        return 0.0;
    }
    // Scale in cents first so whole-unit shares come out exact.
    (amount.cents() as f64 * 100.0) / total.cents() as f64
}

impl Reconciliation {
    /// Percentage for a category; categories without an entry are at zero
    pub fn percentage(&self, category_id: CategoryId) -> f64 {
        self.percentages.get(&category_id).copied().unwrap_or(0.0)
    }

    pub fn status(&self) -> AllocationStatus {
        if self.unallocated.is_negative() {
            AllocationStatus::OverAllocated(self.unallocated.abs())
        } else if self.unallocated.is_positive() {
            AllocationStatus::Unallocated(self.unallocated)
        } else {
            AllocationStatus::Balanced
        }
    }

    pub fn is_over_allocated(&self) -> bool {
        self.unallocated.is_negative()
    }

    /// Whether the "money left to assign" notice should show
    ///
    /// Only shown when there is a positive total to speak of.
    pub fn shows_unallocated_notice(&self) -> bool {
        self.total.is_positive() && self.unallocated.is_positive()
    }

    /// Share of the total already allocated, in percent
    pub fn allocated_percentage(&self) -> f64 {
        percentage_of(self.allocated, self.total)
    }
}
