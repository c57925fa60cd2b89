//! Event handling for the TUI
//!
//! Terminal input is read on a background thread and merged into a single
//! channel with wake-ups posted when the calculator writes from its
//! auto-allocate task. The writes themselves are queued in the App.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

/// Events processed by the main loop
#[derive(Debug, Clone)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Tick event for the spinner
    Tick,
    /// The calculator queued writes for the App to apply
    AllocationsReady,
}

/// Event handler for terminal events
pub struct EventHandler {
    sender: mpsc::Sender<Event>,
    receiver: mpsc::Receiver<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        let input = sender.clone();

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        let forwarded = match event::read() {
                            Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                                input.send(Event::Key(key))
                            }
                            Ok(CrosstermEvent::Resize(width, height)) => {
                                input.send(Event::Resize(width, height))
                            }
                            Ok(_) => Ok(()),
                            Err(e) => {
                                warn!(error = %e, "Failed to read terminal event");
                                Ok(())
                            }
                        };
                        if forwarded.is_err() {
                            return;
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!(error = %e, "Failed to poll terminal events");
                        return;
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if input.send(Event::Tick).is_err() {
                        return;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { sender, receiver }
    }

    /// A wake-up that posts [`Event::AllocationsReady`] into this stream
    pub fn allocation_waker(&self) -> impl Fn() + Send + Sync + 'static {
        let sender = self.sender.clone();
        move || {
            // The loop has exited once the receiver is gone.
            let _ = sender.send(Event::AllocationsReady);
        }
    }

    /// Get the next event (blocking)
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.receiver.recv()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}
