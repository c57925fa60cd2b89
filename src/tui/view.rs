//! Calculator screen
//!
//! Renders the summary cards, the status notice and period analysis, one row
//! per expense category, the active input and a key-hint status bar.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::allocation::{AllocationStatus, CalculatorView};
use crate::display::budget::percentage_bar;
use crate::tui::app::{App, InputMode};
use crate::tui::layout::CalculatorLayout;

/// Render the whole screen
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = CalculatorLayout::new(frame.area());
    let view = app.view();

    render_header(frame, app, layout.header);
    render_cards(frame, app, &view, &layout);
    render_alert(frame, app, &view, layout.alert);
    render_table(frame, app, &view, layout.table);

    if let Some(input) = &app.input {
        frame.render_widget(input, layout.input);
    }

    render_status_bar(frame, app, &view, layout.status_bar);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let period = match (app.form.start_date, app.form.end_date) {
        (Some(start), Some(end)) => format!("{} → {}", start, end),
        _ => "no period".to_string(),
    };

    let block = Block::default()
        .title(format!(" {} ", app.form.name))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let paragraph = Paragraph::new(Line::from(Span::styled(
        period,
        Style::default().fg(Color::DarkGray),
    )))
    .block(block);
    frame.render_widget(paragraph, area);
}

fn render_cards(frame: &mut Frame, app: &App, view: &CalculatorView, layout: &CalculatorLayout) {
    let reconciliation = &view.reconciliation;
    let unallocated_color = match view.status() {
        AllocationStatus::OverAllocated(_) => Color::Red,
        AllocationStatus::Balanced => Color::Green,
        AllocationStatus::Unallocated(_) => Color::Yellow,
    };

    let cards = [
        ("Total", app.currency.format(reconciliation.total), Color::White),
        (
            "Allocated",
            format!(
                "{} ({})",
                app.currency.format(reconciliation.allocated),
                app.currency.format_percent(reconciliation.allocated_percentage())
            ),
            Color::Cyan,
        ),
        (
            "Unallocated",
            app.currency.format(reconciliation.unallocated),
            unallocated_color,
        ),
    ];

    for ((title, value, color), area) in cards.into_iter().zip(layout.cards()) {
        let paragraph = Paragraph::new(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .block(Block::default().title(format!(" {} ", title)).borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }
}

fn render_alert(frame: &mut Frame, app: &App, view: &CalculatorView, area: Rect) {
    let reconciliation = &view.reconciliation;
    let mut lines = Vec::with_capacity(2);

    match view.status() {
        AllocationStatus::OverAllocated(excess) => lines.push(Line::from(Span::styled(
            format!(" ⚠ Over-allocated by {}", app.currency.format(excess)),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))),
        AllocationStatus::Unallocated(rest) if reconciliation.shows_unallocated_notice() => {
            lines.push(Line::from(Span::styled(
                format!(" ℹ {} still to allocate", app.currency.format(rest)),
                Style::default().fg(Color::Yellow),
            )))
        }
        _ => lines.push(Line::from("")),
    }

    if view.metrics.days > 0 {
        lines.push(Line::from(Span::styled(
            format!(
                " {} days · {} per day · {} per month",
                view.metrics.days,
                app.currency.format(view.metrics.daily_amount),
                app.currency.format(view.metrics.monthly_average)
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_table(frame: &mut Frame, app: &App, view: &CalculatorView, area: Rect) {
    let block = Block::default()
        .title(" Expenses ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    if view.rows.is_empty() {
        let paragraph = Paragraph::new("No expense categories selected.").block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let editing = match app.input_mode {
        InputMode::EditingAmount(id) => Some(id),
        _ => None,
    };

    let rows = view.rows.iter().map(|row| {
        // While typing, show the text as entered rather than the parsed amount.
        let amount = if editing == Some(row.id) {
            row.raw_amount.clone()
        } else {
            app.currency.format(row.amount)
        };
        let minus_style = if row.can_decrement {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        Row::new(vec![
            Cell::from(row.name.clone()),
            Cell::from(Span::styled("−", minus_style)),
            Cell::from(amount),
            Cell::from("+"),
            Cell::from(app.currency.format_percent(row.percentage)),
            Cell::from(percentage_bar(row.percentage)),
        ])
    });

    let header = Row::new(vec!["Category", "", "Amount", "", "%", ""])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Min(14),
            Constraint::Length(1),
            Constraint::Length(16),
            Constraint::Length(1),
            Constraint::Length(7),
            Constraint::Length(20),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_status_bar(frame: &mut Frame, app: &App, view: &CalculatorView, area: Rect) {
    let mut spans = vec![];

    if view.is_auto_allocating {
        spans.push(Span::styled(
            format!(" {} ", app.spinner()),
            Style::default().fg(Color::Cyan),
        ));
    }

    if let Some(ref message) = app.status_message {
        spans.push(Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Yellow),
        ));
    }

    let hints = match app.input_mode {
        InputMode::Normal if view.can_auto_allocate => {
            " ↑↓ select  +/- step  ←→ slide  ⏎ edit  t total  a auto  s save  q cancel "
        }
        InputMode::Normal => " ↑↓ select  +/- step  ←→ slide  ⏎ edit  t total  s save  q cancel ",
        _ => " ⏎/Esc done ",
    };

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize).saturating_sub(left_len + hints.chars().count());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
