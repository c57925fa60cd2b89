//! Terminal User Interface module
//!
//! An interactive allocation calculator for one budget, built on ratatui.
//! Terminal input and wake-ups for late calculator writes share one event channel.

pub mod app;
pub mod event;
pub mod handler;
pub mod layout;
pub mod terminal;
pub mod view;
pub mod widgets;

pub use app::App;
pub use terminal::run_calculator;
