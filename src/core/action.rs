//! # Actions
//!
//! Everything that can happen in exitto becomes an `Action`.
//! User picks a country? That's `Action::SelectCountry(node)`.
//! The torrc was patched? That's `Action::ExitNodeApplied { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing the I/O to perform next.
//! No side effects here. The TUI (or CLI) runs the effect and feeds the
//! result back in as another action.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use std::path::PathBuf;

use crate::core::countries::NodeCode;
use crate::core::state::{App, Screen};
use crate::core::torrc::{CurrentCode, DIRECTIVE_MARKER, PatchOutcome};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectCountry(NodeCode),
    /// Write the selected country to the torrc.
    ApplyExitNode,
    OpenTorrcScreen,
    ShowExitNodeScreen,
    SubmitTorrcPath(String),
    CurrentCodeLoaded(CurrentCode),
    ExitNodeApplied {
        node: NodeCode,
        outcome: PatchOutcome,
    },
    TorrcPathSaved {
        path: PathBuf,
        result: Result<(), String>,
    },
    Quit,
}

/// I/O requested by `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    PatchTorrc { path: PathBuf, node: NodeCode },
    SaveTorrcPath(PathBuf),
    LoadCurrentCode(PathBuf),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::SelectCountry(node) => {
            app.selected = Some(node);
            app.status_message = format!("Selected {}", node.country());
            Effect::None
        }
        Action::ApplyExitNode => {
            let Some(node) = app.selected else {
                app.status_message = "Select a country first".to_string();
                return Effect::None;
            };
            match &app.torrc_file {
                Some(path) => Effect::PatchTorrc {
                    path: path.clone(),
                    node,
                },
                None => {
                    app.status_message = "No torrc file configured".to_string();
                    Effect::None
                }
            }
        }
        Action::ExitNodeApplied { node, outcome } => {
            app.status_message = match &outcome {
                PatchOutcome::Patched { .. } => {
                    app.current = Some(node);
                    format!("New Tor exit node: '{}'", node.country())
                }
                PatchOutcome::NoDirective => {
                    format!("No {} line in the torrc, nothing changed", DIRECTIVE_MARKER)
                }
                failure => format!("Could not change exit node: {}", failure),
            };
            Effect::None
        }
        Action::OpenTorrcScreen => {
            app.screen = Screen::TorrcPath;
            Effect::None
        }
        Action::ShowExitNodeScreen => {
            app.screen = Screen::ExitNode;
            Effect::None
        }
        Action::SubmitTorrcPath(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                app.status_message = "Torrc file path is empty".to_string();
                return Effect::None;
            }
            Effect::SaveTorrcPath(PathBuf::from(trimmed))
        }
        Action::TorrcPathSaved { path, result } => {
            app.status_message = match result {
                Ok(()) => "Torrc file path saved".to_string(),
                Err(e) => format!("Using torrc path for this session only: {}", e),
            };
            app.torrc_file = Some(path.clone());
            Effect::LoadCurrentCode(path)
        }
        Action::CurrentCodeLoaded(current) => {
            app.current = current.node();
            app.selected = app.current;
            match current {
                CurrentCode::Configured(code) if app.current.is_none() => {
                    app.status_message = format!("Torrc lists an unknown exit node {{{}}}", code);
                }
                CurrentCode::Configured(_) => {}
                CurrentCode::NotConfigured => {
                    app.status_message = format!("No {} line in the torrc yet", DIRECTIVE_MARKER);
                }
                CurrentCode::Malformed => {
                    app.status_message = format!("{} line has no {{code}} token", DIRECTIVE_MARKER);
                }
                CurrentCode::FileMissing => {
                    app.status_message = "Please give a valid torrc file".to_string();
                }
                CurrentCode::Unreadable(e) => {
                    app.status_message = format!("Could not read torrc: {}", e);
                }
            }
            Effect::None
        }
        Action::Quit => {
            app.should_quit = true;
            Effect::Quit
        }
    }
}
