//! # Application State
//!
//! Core business state for exitto. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── torrc_file: Option<PathBuf>   // file every operation is pointed at
//! ├── current: Option<NodeCode>     // first exit node as read from the torrc
//! ├── selected: Option<NodeCode>    // country picked in the menu
//! ├── screen: Screen                // which screen is shown
//! ├── status_message: String        // feedback line
//! └── should_quit: bool
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! The torrc path is held here and handed to each file operation explicitly.

use std::path::PathBuf;

use crate::core::countries::NodeCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Country list and the "Change exit node" action.
    ExitNode,
    /// Editing the torrc file path.
    TorrcPath,
}

pub struct App {
    pub torrc_file: Option<PathBuf>,
    pub current: Option<NodeCode>,
    pub selected: Option<NodeCode>,
    pub screen: Screen,
    pub status_message: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(torrc_file: Option<PathBuf>) -> Self {
        Self {
            torrc_file,
            current: None,
            selected: None,
            screen: Screen::ExitNode,
            status_message: String::new(),
            should_quit: false,
        }
    }

    /// Country shown in the "Current Exit Node" status bar.
    pub fn current_country(&self) -> &'static str {
        self.current.map(NodeCode::country).unwrap_or("None")
    }

    /// Path shown in the "Torrc file path" status bar.
    pub fn torrc_display(&self) -> String {
        self.torrc_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;
    use super::*;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.screen, Screen::ExitNode);
        assert!(app.current.is_none());
        assert!(app.selected.is_none());
        assert!(!app.should_quit);
        assert_eq!(app.torrc_display(), "/tmp/exitto-test-torrc");
    }

    #[test]
    fn test_current_country_label() {
        let mut app = App::new(None);
        assert_eq!(app.current_country(), "None");
        assert_eq!(app.torrc_display(), "");
        app.current = Some(NodeCode::Ch);
        assert_eq!(app.current_country(), "Switzerland");
    }
}
