//! Allocation edit surface and auto-allocator
//!
//! [`AllocationCalculator`] never holds allocation data. Each operation reads
//! the owner's current values from [`CalculatorProps`], works out the new raw
//! amount and hands it to the [`AllocationSink`]. The owner applies it and the
//! next render sees the result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::models::{Category, CategoryId, Money};

use super::reconcile::percentage_of;
use super::view::CalculatorView;
use super::{AllocationChange, AllocationSink, CalculatorProps, CalculatorSettings};

/// Edit surface for one open budget form
///
/// Dropping the calculator (or calling [`dispose`](Self::dispose)) cancels a
/// pending auto-allocation so it never writes to an owner that is gone.
pub struct AllocationCalculator {
    runtime: Handle,
    sink: Arc<dyn AllocationSink>,
    settings: CalculatorSettings,
    busy: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl AllocationCalculator {
    /// Create a calculator that schedules auto-allocation on `runtime`
    pub fn new<S: AllocationSink>(runtime: Handle, sink: S, settings: CalculatorSettings) -> Self {
        Self {
            runtime,
            sink: Arc::new(sink),
            settings,
            busy: Arc::new(AtomicBool::new(false)),
            cancel: CancellationToken::new(),
        }
    }

    pub fn settings(&self) -> &CalculatorSettings {
        &self.settings
    }

    /// Build the read model for the current props
    pub fn view(&self, props: &CalculatorProps<'_>) -> CalculatorView {
        CalculatorView::build(props, self.is_auto_allocating())
    }

    /// Forward a typed value verbatim
    ///
    /// No rounding or validation happens here; a half-typed "12." is passed
    /// through so the field keeps what the user entered.
    pub fn set_amount(&self, category_id: CategoryId, raw: &str) -> Option<AllocationChange> {
        self.emit(AllocationChange::new(category_id, raw))
    }

    /// Add `delta` to a category, clamped at zero and rounded to a whole unit
    pub fn adjust(
        &self,
        props: &CalculatorProps<'_>,
        category_id: CategoryId,
        delta: Money,
    ) -> Option<AllocationChange> {
        let current = props.expense_allocations.amount(category_id);
        let next = (current + delta).max(Money::zero()).round_to_units();
        self.emit(AllocationChange::new(category_id, next.to_input_string()))
    }

    /// One stepper press up
    pub fn increment(
        &self,
        props: &CalculatorProps<'_>,
        category_id: CategoryId,
    ) -> Option<AllocationChange> {
        self.adjust(props, category_id, self.settings.stepper_increment)
    }

    /// One stepper press down; ignored while the decrement control is disabled
    pub fn decrement(
        &self,
        props: &CalculatorProps<'_>,
        category_id: CategoryId,
    ) -> Option<AllocationChange> {
        if !Self::can_decrement(props, category_id) {
            debug!(category = %category_id, "Decrement ignored at zero");
            return None;
        }
        self.adjust(props, category_id, -self.settings.stepper_increment)
    }

    /// Whether the decrement control is enabled for a category
    pub fn can_decrement(props: &CalculatorProps<'_>, category_id: CategoryId) -> bool {
        props.expense_allocations.amount(category_id).is_positive()
    }

    /// Translate a slider position into an amount and forward it
    ///
    /// The percentage is snapped to the slider step and clamped to 0..=100.
    /// Other categories are left alone; the remainder absorbs the change. A
    /// total that is not positive maps every position to zero.
    pub fn set_percentage(
        &self,
        props: &CalculatorProps<'_>,
        category_id: CategoryId,
        percentage: f64,
    ) -> Option<AllocationChange> {
        let percentage = self.snap_percentage(percentage);
        let total = props.total().max(Money::zero());
        let amount = Money::from_f64_rounded(percentage * total.as_f64() / 100.0);
        self.emit(AllocationChange::new(category_id, amount.to_input_string()))
    }

    /// Move a slider by a number of steps from its current position
    pub fn nudge_percentage(
        &self,
        props: &CalculatorProps<'_>,
        category_id: CategoryId,
        steps: i32,
    ) -> Option<AllocationChange> {
        let current = percentage_of(props.expense_allocations.amount(category_id), props.total());
        let target = current + f64::from(steps) * self.settings.slider_step;
        self.set_percentage(props, category_id, target)
    }

    /// Split the total evenly across every expense category
    ///
    /// The plan is computed from the props at call time and written after the
    /// pacing delay, overwriting whatever the map holds by then. Returns `None`
    /// without touching the busy flag when there is nothing to do: no
    /// categories, a total that is not positive, a run already pending, or a
    /// disposed calculator.
    pub fn auto_allocate(&self, props: &CalculatorProps<'_>) -> Option<JoinHandle<()>> {
        if self.is_disposed() {
            return None;
        }

        let plan = equal_split(props.total(), props.expense_categories);
        if plan.is_empty() {
            debug!("Auto-allocation skipped: no categories or no total");
            return None;
        }

        let busy = BusyGuard::engage(&self.busy)?;
        let sink = Arc::clone(&self.sink);
        let token = self.cancel.clone();
        let delay = self.settings.auto_allocate_delay;

        info!(
            categories = plan.len(),
            per_category = %plan[0].amount,
            "Auto-allocation scheduled"
        );

        Some(self.runtime.spawn(async move {
            let _busy = busy;

            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    debug!("Auto-allocation cancelled before completion");
                }
                _ = tokio::time::sleep(delay) => {
                    for change in plan {
                        if token.is_cancelled() {
                            debug!("Auto-allocation cancelled mid-batch");
                            return;
                        }
                        sink.on_allocation_change(change.category_id, change.amount);
                    }
                    debug!("Auto-allocation applied");
                }
            }
        }))
    }

    pub fn is_auto_allocating(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Tear down: cancel pending work and stop forwarding edits
    pub fn dispose(&self) {
        if !self.cancel.is_cancelled() {
            debug!("Allocation calculator disposed");
            self.cancel.cancel();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn snap_percentage(&self, percentage: f64) -> f64 {
        if !percentage.is_finite() {
            return 0.0;
        }
        let step = self.settings.slider_step;
        let snapped = if step > 0.0 {
            (percentage / step).round() * step
        } else {
            percentage
        };
        snapped.clamp(0.0, 100.0)
    }

    fn emit(&self, change: AllocationChange) -> Option<AllocationChange> {
        if self.is_disposed() {
            debug!(category = %change.category_id, "Edit dropped after dispose");
            return None;
        }
        debug!(category = %change.category_id, amount = %change.amount, "Allocation change");
        self.sink
            .on_allocation_change(change.category_id, change.amount.clone());
        Some(change)
    }
}

impl Drop for AllocationCalculator {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Equal share of `total` for each category, truncated to whole units
///
/// Empty when there are no categories or the total is not positive. The
/// truncation remainder is left unallocated.
pub fn equal_split(total: Money, categories: &[Category]) -> Vec<AllocationChange> {
    if categories.is_empty() || !total.is_positive() {
        return Vec::new();
    }

    let share = Money::from_cents(total.cents() / categories.len() as i64).trunc_to_units();
    categories
        .iter()
        .map(|c| AllocationChange::new(c.id, share.to_input_string()))
        .collect()
}

/// Holds the busy flag for the lifetime of one auto-allocation
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn engage(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
