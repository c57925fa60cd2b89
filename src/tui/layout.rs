//! Layout definitions for the TUI
//!
//! One screen: header, summary cards, alert line, category table, input line
//! and status bar.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout regions for the calculator screen
pub struct CalculatorLayout {
    /// Budget name and period
    pub header: Rect,
    /// Total / Allocated / Unallocated cards
    pub cards: Rect,
    /// Over-allocation or remainder notice, plus period analysis
    pub alert: Rect,
    /// Per-category rows
    pub table: Rect,
    /// Active text input, if any
    pub input: Rect,
    /// Status bar at the bottom
    pub status_bar: Rect,
}

impl CalculatorLayout {
    /// Calculate layout from available area
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Cards
                Constraint::Length(2), // Alert + analysis
                Constraint::Min(3),    // Table
                Constraint::Length(1), // Input
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        Self {
            header: chunks[0],
            cards: chunks[1],
            alert: chunks[2],
            table: chunks[3],
            input: chunks[4],
            status_bar: chunks[5],
        }
    }

    /// Split the card row into three equal boxes
    pub fn cards(&self) -> [Rect; 3] {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(self.cards);
        [chunks[0], chunks[1], chunks[2]]
    }
}
