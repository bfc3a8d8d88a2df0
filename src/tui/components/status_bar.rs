//! # StatusBar Component
//!
//! Bottom line of each screen:
//!
//! ```text
//! Current Exit Node: France                 New Tor exit node: 'France'
//! └── label: value (left)                   message (right, dim) ──────┘
//! ```
//!
//! Stateless; all three fields are props.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct StatusBar<'a> {
    pub label: &'a str,
    pub value: &'a str,
    /// Feedback from the last action; may be empty.
    pub message: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new(label: &'a str, value: &'a str, message: &'a str) -> Self {
        Self {
            label,
            value,
            message,
        }
    }
}

impl Component for StatusBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);

        let status = Line::from(vec![
            Span::styled(
                format!("{}: ", self.label),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(self.value.to_string()),
        ]);
        frame.render_widget(status, left);

        if !self.message.is_empty() {
            let message = Line::from(self.message.to_string())
                .style(Style::default().fg(Color::DarkGray))
                .right_aligned();
            frame.render_widget(message, right);
        }
    }
}
