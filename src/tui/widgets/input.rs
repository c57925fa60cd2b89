//! Text input widget
//!
//! A single-line input with a cursor. The cursor counts characters, not
//! bytes, so currency symbols and separators can be typed safely.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// A simple text input widget
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    content: String,
    cursor: usize,
    label: String,
}

impl TextInput {
    /// Start editing with a label and an initial value, cursor at the end
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            cursor: content.chars().count(),
            content,
            label: label.into(),
        }
    }

    /// Insert a character at the cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.content.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.content.remove(at);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index();
            self.content.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn value(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }
}

impl Widget for &TextInput {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label_width = if self.label.is_empty() {
            0
        } else {
            self.label.chars().count() + 2
        };
        let input_start = area.x + label_width as u16;

        if !self.label.is_empty() {
            let label_line = Line::from(vec![
                Span::styled(self.label.as_str(), Style::default().fg(Color::Cyan)),
                Span::raw(": "),
            ]);
            buf.set_line(area.x, area.y, &label_line, label_width as u16);
        }

        buf.set_string(
            input_start,
            area.y,
            &self.content,
            Style::default().fg(Color::White),
        );

        let cursor_x = input_start + self.cursor as u16;
        if cursor_x < area.x + area.width {
            let cursor_char = self.content.chars().nth(self.cursor).unwrap_or('_');
            buf.set_string(
                cursor_x,
                area.y,
                cursor_char.to_string(),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace() {
        let mut input = TextInput::new("Amount", "12");
        input.insert('5');
        assert_eq!(input.value(), "125");

        input.move_left();
        input.backspace();
        assert_eq!(input.value(), "15");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn test_multibyte_content() {
        let mut input = TextInput::new("", "1\u{a0}000");
        input.move_start();
        input.move_right();
        input.delete();
        assert_eq!(input.value(), "1000");

        input.move_end();
        input.insert('₽');
        assert_eq!(input.value(), "1000₽");
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn test_cursor_bounds() {
        let mut input = TextInput::new("", "");
        input.move_left();
        input.backspace();
        input.delete();
        input.move_right();
        assert_eq!(input.cursor(), 0);
        assert_eq!(input.value(), "");
    }
}
