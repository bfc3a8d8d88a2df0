//! # TitleBar Component
//!
//! Screen title on the top line, centered.
//!
//! Purely presentational: the title is a prop and there is no internal
//! state, so the screen builds a fresh one every frame.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;

pub struct TitleBar {
    /// Screen title (e.g., "TOR Exit Node Change")
    pub title: &'static str,
}

impl TitleBar {
    pub fn new(title: &'static str) -> Self {
        Self { title }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(self.title)
            .style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .centered();
        frame.render_widget(line, area);
    }
}
