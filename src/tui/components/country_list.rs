//! # Country List Component
//!
//! Radio-button list of the exit-node countries on the main screen.
//!
//! ```text
//!   ( ) Belgium
//!   (X) France        ← chosen (prop, mirrors App::selected)
//! > ( ) Italy         ← highlighted row (internal state)
//! ```
//!
//! Up/Down move the highlight, Space/Enter choose the highlighted country.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState};

use crate::core::countries::NodeCode;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryListEvent {
    Select(NodeCode),
}

pub struct CountryList {
    /// Country marked `(X)` (Prop)
    pub chosen: Option<NodeCode>,
    /// Whether keyboard focus is on the list (Prop)
    pub focused: bool,
    list_state: ListState,
}

impl CountryList {
    pub fn new() -> Self {
        Self {
            chosen: None,
            focused: true,
            list_state: ListState::default().with_selected(Some(0)),
        }
    }

    /// Row under the highlight.
    pub fn highlighted(&self) -> NodeCode {
        let row = self.list_state.selected().unwrap_or_default();
        NodeCode::ALL[row.min(NodeCode::ALL.len() - 1)]
    }

    /// Moves the highlight onto `node`.
    pub fn highlight(&mut self, node: NodeCode) {
        self.list_state.select(Some(node.index()));
    }
}

impl Default for CountryList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for CountryList {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = NodeCode::ALL
            .iter()
            .map(|&node| {
                let mark = if self.chosen == Some(node) { "(X)" } else { "( )" };
                ListItem::new(Line::from(format!("{} {}", mark, node.country())))
            })
            .collect();

        let border_style = if self.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let highlight_style = if self.focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        let list = List::new(items)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(border_style)
                    .title(" Exit node "),
            )
            .highlight_style(highlight_style)
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}

impl EventHandler for CountryList {
    type Event = CountryListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let row = self.list_state.selected().unwrap_or_default();
        match event {
            TuiEvent::CursorUp => {
                self.list_state.select(Some(row.saturating_sub(1)));
                None
            }
            TuiEvent::CursorDown => {
                self.list_state
                    .select(Some((row + 1).min(NodeCode::ALL.len() - 1)));
                None
            }
            TuiEvent::CursorHome => {
                self.list_state.select(Some(0));
                None
            }
            TuiEvent::CursorEnd => {
                self.list_state.select(Some(NodeCode::ALL.len() - 1));
                None
            }
            TuiEvent::Submit | TuiEvent::InputChar(' ') => {
                Some(CountryListEvent::Select(self.highlighted()))
            }
            _ => None,
        }
    }
}
