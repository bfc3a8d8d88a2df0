//! # ButtonBar Component
//!
//! A centered row of buttons under each screen's content. Left/Right move
//! between buttons, Enter presses the focused one and reports its index.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Width of every button, borders included.
const BUTTON_WIDTH: u16 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed(usize),
}

pub struct ButtonBar {
    labels: Vec<&'static str>,
    /// Index of the button that Enter would press (Internal State)
    pub current: usize,
    /// Whether keyboard focus is on the bar (Prop)
    pub focused: bool,
}

impl ButtonBar {
    pub fn new(labels: Vec<&'static str>) -> Self {
        Self {
            labels,
            current: 0,
            focused: false,
        }
    }
}

impl Component for ButtonBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let constraints = self.labels.iter().map(|_| Constraint::Length(BUTTON_WIDTH));
        let areas = Layout::horizontal(constraints)
            .flex(Flex::Center)
            .spacing(1)
            .split(area);

        for (index, (label, button_area)) in self.labels.iter().zip(areas.iter()).enumerate() {
            let active = self.focused && index == self.current;
            let style = if active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let button = Paragraph::new(*label)
                .centered()
                .style(style)
                .block(Block::bordered().border_type(BorderType::Rounded));
            frame.render_widget(button, *button_area);
        }
    }
}

impl EventHandler for ButtonBar {
    type Event = ButtonEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.labels.is_empty() {
            return None;
        }
        match event {
            TuiEvent::CursorLeft => {
                self.current = self.current.saturating_sub(1);
                None
            }
            TuiEvent::CursorRight => {
                self.current = (self.current + 1).min(self.labels.len() - 1);
                None
            }
            TuiEvent::Submit | TuiEvent::InputChar(' ') => Some(ButtonEvent::Pressed(self.current)),
            _ => None,
        }
    }
}
