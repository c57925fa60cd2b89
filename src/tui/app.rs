//! Application state for the TUI
//!
//! The App owns the budget form and the calculator that edits it. Calculator
//! writes land in a queue the App drains into the form: right after every
//! edit it makes itself, and when the event loop is woken by
//! [`Event::AllocationsReady`](super::event::Event::AllocationsReady) for a
//! late auto-allocate write. Each edit therefore reads the result of the one
//! before it.

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{info, warn};

use crate::allocation::{AllocationCalculator, AllocationChange, CalculatorView, CurrencyFormat};
use crate::config::settings::Settings;
use crate::form::{BudgetForm, FormStep};
use crate::models::{Budget, CategoryId};
use crate::services::BudgetService;
use crate::storage::Storage;

use super::widgets::TextInput;

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Mode of input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing an amount for one category
    EditingAmount(CategoryId),
    /// Typing the budget total
    EditingTotal,
}

/// Main application state
pub struct App<'a> {
    pub storage: &'a Storage,
    pub form: BudgetForm,
    pub calculator: AllocationCalculator,
    changes: UnboundedReceiver<AllocationChange>,
    pub currency: CurrencyFormat,

    /// Index of the highlighted expense category
    pub selected: usize,
    pub input_mode: InputMode,
    pub input: Option<TextInput>,

    /// Status message to display
    pub status_message: Option<String>,
    spinner_frame: usize,

    pub should_quit: bool,
    /// Set once the budget has been saved
    pub saved: Option<Budget>,
}

impl<'a> App<'a> {
    /// Create a new App instance editing `form`
    ///
    /// `wake` is called after every calculator write so a loop blocked on
    /// input notices writes made from the auto-allocate task.
    pub fn new<W>(
        storage: &'a Storage,
        settings: &Settings,
        runtime: Handle,
        mut form: BudgetForm,
        wake: W,
    ) -> Self
    where
        W: Fn() + Send + Sync + 'static,
    {
        form.go_to(FormStep::Allocation);

        let (tx, changes) = unbounded_channel();
        let sink = move |category_id: CategoryId, amount: String| {
            // A closed queue means the App is gone.
            if tx.send(AllocationChange::new(category_id, amount)).is_ok() {
                wake();
            }
        };

        Self {
            storage,
            form,
            calculator: AllocationCalculator::new(runtime, sink, settings.calculator_settings()),
            changes,
            currency: settings.currency_format(),
            selected: 0,
            input_mode: InputMode::Normal,
            input: None,
            status_message: None,
            spinner_frame: 0,
            should_quit: false,
            saved: None,
        }
    }

    /// Current read model of the calculator
    pub fn view(&self) -> CalculatorView {
        self.calculator.view(&self.form.props())
    }

    pub fn selected_category(&self) -> Option<CategoryId> {
        self.form
            .expense_categories()
            .get(self.selected)
            .map(|c| c.id)
    }

    pub fn select_next(&mut self) {
        let count = self.form.expense_categories().len();
        if count > 0 {
            self.selected = (self.selected + 1).min(count - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Apply every write the calculator has queued, in order
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(change) = self.changes.try_recv() {
            if self.form.apply_change(change) {
                applied += 1;
            } else {
                warn!("Dropped allocation change for a category no longer selected");
            }
        }
        applied
    }

    pub fn increment(&mut self) {
        if let Some(id) = self.selected_category() {
            self.calculator.increment(&self.form.props(), id);
            self.apply_pending();
        }
    }

    pub fn decrement(&mut self) {
        if let Some(id) = self.selected_category() {
            self.calculator.decrement(&self.form.props(), id);
            self.apply_pending();
        }
    }

    /// Move the selected category's slider by `steps`
    pub fn nudge(&mut self, steps: i32) {
        if let Some(id) = self.selected_category() {
            self.calculator.nudge_percentage(&self.form.props(), id, steps);
            self.apply_pending();
        }
    }

    pub fn auto_allocate(&mut self) {
        // Writes arrive later through the queue; the handle is not needed.
        match self.calculator.auto_allocate(&self.form.props()) {
            Some(_) => self.set_status("Auto-allocating..."),
            None if self.calculator.is_auto_allocating() => {}
            None => self.set_status("Nothing to allocate"),
        }
    }

    /// Start typing an amount for the selected category
    pub fn start_amount_edit(&mut self) {
        let Some(category) = self.form.expense_categories().get(self.selected) else {
            return;
        };
        let current = self
            .form
            .expense_allocations()
            .get(category.id)
            .unwrap_or_default()
            .to_string();
        self.input = Some(TextInput::new(category.name.clone(), current));
        self.input_mode = InputMode::EditingAmount(category.id);
    }

    pub fn start_total_edit(&mut self) {
        self.input = Some(TextInput::new("Total", self.form.total_amount.clone()));
        self.input_mode = InputMode::EditingTotal;
    }

    /// Change the active input and forward its text as typed
    pub fn edit_input(&mut self, edit: impl FnOnce(&mut TextInput)) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        edit(input);
        let value = input.value().to_string();

        match self.input_mode {
            InputMode::EditingAmount(id) => {
                self.calculator.set_amount(id, &value);
                self.apply_pending();
            }
            InputMode::EditingTotal => self.form.total_amount = value,
            InputMode::Normal => {}
        }
    }

    pub fn finish_edit(&mut self) {
        self.input = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn is_editing(&self) -> bool {
        self.input_mode != InputMode::Normal
    }

    /// Validate and persist the budget, then quit
    pub fn save(&mut self) {
        if self.calculator.is_auto_allocating() {
            self.set_status("Wait for auto-allocation to finish");
            return;
        }

        match BudgetService::new(self.storage).save_form(&self.form) {
            Ok(budget) => {
                info!(budget = %budget.id, "Saved budget from calculator");
                self.calculator.dispose();
                self.saved = Some(budget);
                self.should_quit = true;
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Leave without saving
    pub fn cancel(&mut self) {
        self.calculator.dispose();
        self.should_quit = true;
    }

    /// Advance the spinner; clears the auto-allocate notice once done
    pub fn tick(&mut self) {
        if self.calculator.is_auto_allocating() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
        } else if self.status_message.as_deref() == Some("Auto-allocating...") {
            self.status_message = None;
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.spinner_frame]
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }
}
