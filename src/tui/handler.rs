//! Event handler for the TUI
//!
//! Routes keyboard events to the calculator controls based on the current
//! input mode. Wake-ups from the calculator drain its queued writes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, InputMode};
use super::event::Event;

/// Slider steps moved by one arrow press with Shift held
const COARSE_STEPS: i32 = 10;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::AllocationsReady => {
            app.apply_pending();
            Ok(())
        }
        Event::Tick => {
            app.apply_pending();
            app.tick();
            Ok(())
        }
        Event::Resize(_, _) => Ok(()),
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.cancel();
        return Ok(());
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::EditingAmount(_) | InputMode::EditingTotal => handle_editing_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> Result<()> {
    let coarse = key.modifiers.contains(KeyModifiers::SHIFT);
    app.status_message = None;

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.cancel(),

        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),

        KeyCode::Char('+') | KeyCode::Char('=') => app.increment(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.decrement(),

        KeyCode::Left => app.nudge(if coarse { -COARSE_STEPS } else { -1 }),
        KeyCode::Right => app.nudge(if coarse { COARSE_STEPS } else { 1 }),

        KeyCode::Enter => app.start_amount_edit(),
        KeyCode::Char('t') => app.start_total_edit(),
        KeyCode::Char('a') => app.auto_allocate(),
        KeyCode::Char('s') => app.save(),

        _ => {}
    }

    Ok(())
}

fn handle_editing_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.finish_edit(),
        KeyCode::Char(c) => app.edit_input(|input| input.insert(c)),
        KeyCode::Backspace => app.edit_input(|input| input.backspace()),
        KeyCode::Delete => app.edit_input(|input| input.delete()),
        KeyCode::Left => app.edit_input(|input| input.move_left()),
        KeyCode::Right => app.edit_input(|input| input.move_right()),
        KeyCode::Home => app.edit_input(|input| input.move_start()),
        KeyCode::End => app.edit_input(|input| input.move_end()),
        _ => {}
    }

    Ok(())
}
