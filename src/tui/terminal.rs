//! Terminal setup and teardown
//!
//! This module handles initializing and restoring the terminal state,
//! including setting up the panic hook to restore the terminal on crash.

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tokio::runtime::Handle;
use tracing::info;

use crate::config::settings::Settings;
use crate::error::{PlannerError, PlannerResult};
use crate::form::BudgetForm;
use crate::models::Budget;
use crate::storage::Storage;

use super::app::App;
use super::event::EventHandler;
use super::handler::handle_event;

/// Type alias for our terminal
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Tui> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Open the calculator on `form` and run until saved or cancelled
///
/// Returns the stored budget when the user saved, `None` when they left
/// without saving.
pub fn run_calculator(
    storage: &Storage,
    settings: &Settings,
    runtime: &Handle,
    form: BudgetForm,
) -> PlannerResult<Option<Budget>> {
    info!(budget = %form.name, "Opening calculator");

    let mut terminal = init_terminal().map_err(|e| PlannerError::Tui(e.to_string()))?;
    let result = event_loop(&mut terminal, storage, settings, runtime, form);
    let restored = restore_terminal();

    let saved = result.map_err(|e| PlannerError::Tui(e.to_string()))?;
    restored.map_err(|e| PlannerError::Tui(e.to_string()))?;
    Ok(saved)
}

fn event_loop(
    terminal: &mut Tui,
    storage: &Storage,
    settings: &Settings,
    runtime: &Handle,
    form: BudgetForm,
) -> Result<Option<Budget>> {
    let events = EventHandler::default();
    let mut app = App::new(
        storage,
        settings,
        runtime.clone(),
        form,
        events.allocation_waker(),
    );

    while !app.should_quit {
        terminal.draw(|frame| super::view::render(frame, &mut app))?;
        let event = events.next()?;
        handle_event(&mut app, event)?;
    }

    Ok(app.saved.take())
}
