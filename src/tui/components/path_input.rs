//! # PathInput Component
//!
//! Single-line editor for the torrc file path.
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. `focused` is a prop from the
//! parent. Submitting does not clear the buffer: the path stays visible
//! after it has been saved.
//!
//! Long paths scroll horizontally so the cursor stays inside the box.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const PROMPT: &str = "Torrc file path: ";

/// Columns taken by the left and right borders.
const HORIZONTAL_OVERHEAD: u16 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathInputEvent {
    Submit(String),
    ContentChanged,
}

pub struct PathInput {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Whether keyboard focus is on the input (Prop)
    pub focused: bool,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
}

impl PathInput {
    pub fn new(initial: &str) -> Self {
        Self {
            buffer: initial.to_string(),
            focused: true,
            cursor: initial.len(),
        }
    }

    /// Replaces the buffer, moving the cursor to the end.
    pub fn set(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.buffer.len())
    }

    /// Visible slice of `PROMPT + buffer` and the cursor column within it.
    fn viewport(&self, width: usize) -> (String, usize) {
        let line = format!("{}{}", PROMPT, self.buffer);
        let cursor_col = PROMPT.width() + self.buffer[..self.cursor].width();
        if width == 0 || cursor_col < width {
            return (line, cursor_col);
        }

        // Drop leading chars until the cursor fits in the last column
        let mut skipped = 0;
        let mut start = 0;
        for (i, c) in line.char_indices() {
            if cursor_col - skipped < width {
                start = i;
                break;
            }
            skipped += c.width().unwrap_or(0);
            start = i + c.len_utf8();
        }
        (line[start..].to_string(), cursor_col - skipped)
    }
}

impl Component for PathInput {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;
        let (visible, cursor_col) = self.viewport(inner_width);

        let border_style = if self.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let input = Paragraph::new(visible).block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(border_style),
        );
        frame.render_widget(input, area);

        if self.focused {
            frame.set_cursor_position((area.x + 1 + cursor_col as u16, area.y + 1));
        }
    }
}

impl EventHandler for PathInput {
    type Event = PathInputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(PathInputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // A path is a single line
                let text: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
                self.buffer.insert_str(self.cursor, &text);
                self.cursor += text.len();
                Some(PathInputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = self.prev_boundary();
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                    Some(PathInputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = self.next_boundary();
                    self.buffer.drain(self.cursor..next);
                    Some(PathInputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                (self.cursor > 0).then(|| {
                    self.cursor = self.prev_boundary();
                    PathInputEvent::ContentChanged
                })
            }
            TuiEvent::CursorRight => {
                (self.cursor < self.buffer.len()).then(|| {
                    self.cursor = self.next_boundary();
                    PathInputEvent::ContentChanged
                })
            }
            TuiEvent::CursorHome => {
                (self.cursor != 0).then(|| {
                    self.cursor = 0;
                    PathInputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                (self.cursor != self.buffer.len()).then(|| {
                    self.cursor = self.buffer.len();
                    PathInputEvent::ContentChanged
                })
            }
            TuiEvent::Submit => Some(PathInputEvent::Submit(self.buffer.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_typing_and_backspace() {
        let mut input = PathInput::new("");
        for c in "/etc".chars() {
            assert_eq!(
                input.handle_event(&TuiEvent::InputChar(c)),
                Some(PathInputEvent::ContentChanged)
            );
        }
        assert_eq!(input.buffer, "/etc");

        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "/et");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_editing_in_the_middle() {
        let mut input = PathInput::new("/etc/torrc");
        input.handle_event(&TuiEvent::CursorHome);
        for _ in 0..5 {
            input.handle_event(&TuiEvent::CursorRight);
        }
        for c in "tor/".chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
        assert_eq!(input.buffer, "/etc/tor/torrc");

        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "/etc/tor/orrc");
    }

    #[test]
    fn test_multibyte_chars() {
        let mut input = PathInput::new("/home/zoé");
        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "/home/zo");
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::InputChar('é'));
        assert_eq!(input.buffer, "/home/zéo");
    }

    #[test]
    fn test_paste_strips_newlines() {
        let mut input = PathInput::new("");
        input.handle_event(&TuiEvent::Paste("/etc/tor/torrc\n".to_string()));
        assert_eq!(input.buffer, "/etc/tor/torrc");
        assert_eq!(input.cursor(), input.buffer.len());
    }

    #[test]
    fn test_submit_keeps_buffer() {
        let mut input = PathInput::new("/etc/tor/torrc");
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(PathInputEvent::Submit("/etc/tor/torrc".to_string()))
        );
        assert_eq!(input.buffer, "/etc/tor/torrc");
    }

    #[test]
    fn test_boundaries_report_no_change() {
        let mut input = PathInput::new("");
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
        assert_eq!(input.handle_event(&TuiEvent::Delete), None);
        assert_eq!(input.handle_event(&TuiEvent::CursorLeft), None);
        assert_eq!(input.handle_event(&TuiEvent::CursorEnd), None);
    }

    #[test]
    fn test_viewport_scrolls_to_cursor() {
        let input = PathInput::new("/a/very/long/path/to/torrc");
        let (visible, col) = input.viewport(20);
        assert!(col < 20);
        assert!(visible.ends_with("torrc"));
    }

    #[test]
    fn test_render_shows_prompt() {
        let backend = TestBackend::new(50, 3);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut input = PathInput::new("/etc/tor/torrc");
        terminal.draw(|f| input.render(f, f.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let text = buffer.content().iter().map(|c| c.symbol()).collect::<String>();
        assert!(text.contains("Torrc file path: /etc/tor/torrc"));
    }
}
