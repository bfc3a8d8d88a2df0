//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm. It is
//! also where `Effect`s get executed: torrc reads and patches, and saving
//! the torrc path to the env file.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop sleeps up to 250ms waiting for input and
//! only redraws after an event (resize included).

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::time::Duration;

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::env_store::{EnvStore, TORRC_PATH_KEY};
use crate::core::state::{App, Screen};
use crate::core::torrc;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ButtonBar, ButtonEvent, CountryList, CountryListEvent, PathInput, PathInputEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const EXIT_NODE_BUTTONS: [&str; 3] = ["Change torrc file", "Change exit node", "Exit"];
const TORRC_BUTTONS: [&str; 3] = ["Save file path", "Cancel", "Main screen"];

/// Which half of the screen receives keys. Tab toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Country list or path input.
    Content,
    Buttons,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub focus: Focus,
    pub country_list: CountryList,
    pub exit_node_buttons: ButtonBar,
    pub path_input: PathInput,
    pub torrc_buttons: ButtonBar,
}

impl TuiState {
    pub fn new(torrc_display: &str) -> Self {
        Self {
            focus: Focus::Content,
            country_list: CountryList::new(),
            exit_node_buttons: ButtonBar::new(EXIT_NODE_BUTTONS.to_vec()),
            path_input: PathInput::new(torrc_display),
            torrc_buttons: ButtonBar::new(TORRC_BUTTONS.to_vec()),
        }
    }

    /// Pushes App state and focus into component props before drawing.
    pub fn sync_props(&mut self, app: &App) {
        let content = self.focus == Focus::Content;
        self.country_list.chosen = app.selected;
        self.country_list.focused = content;
        self.path_input.focused = content;
        self.exit_node_buttons.focused = !content;
        self.torrc_buttons.focused = !content;
    }
}

/// Restores the terminal however `run` exits.
struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> Self {
        // Non-blinking: ratatui resets the blink timer on every draw
        match execute!(stdout(), EnableBracketedPaste, SetCursorStyle::SteadyBlock) {
            Ok(()) => info!("Terminal modes enabled (bracketed paste, steady block cursor)"),
            Err(e) => warn!("Failed to enable terminal modes: {}", e),
        }
        Self
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste, SetCursorStyle::DefaultUserShape);
        ratatui::restore();
    }
}

pub fn run(config: ResolvedConfig, env: EnvStore) -> std::io::Result<()> {
    let mut app = App::new(config.torrc_file.clone());
    let mut tui = TuiState::new(&app.torrc_display());

    if !env.is_configured() || app.torrc_file.is_none() {
        app.screen = Screen::TorrcPath;
    }
    if let Some(path) = app.torrc_file.clone() {
        run_effects(&mut app, Effect::LoadCurrentCode(path), &env);
        if let Some(node) = app.selected {
            tui.country_list.highlight(node);
        }
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();
    let mut needs_redraw = true;

    loop {
        if needs_redraw {
            tui.sync_props(&app);
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(Duration::from_millis(250));
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Drain all pending events before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = route_event(&app, &mut tui, &event) {
                dispatch(&mut app, &mut tui, &env, action);
            }
            if app.should_quit {
                break;
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!("Exiting TUI");
    Ok(())
}

/// Turns a terminal event into an Action, updating TUI-local state on the way.
fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Quit => return Some(Action::Quit),
        TuiEvent::Resize => return None,
        TuiEvent::FocusNext | TuiEvent::FocusPrev => {
            tui.focus = match tui.focus {
                Focus::Content => Focus::Buttons,
                Focus::Buttons => Focus::Content,
            };
            return None;
        }
        TuiEvent::Escape => {
            return Some(match app.screen {
                Screen::ExitNode => Action::Quit,
                Screen::TorrcPath => cancel_torrc_edit(app, tui),
            });
        }
        _ => {}
    }

    match (app.screen, tui.focus) {
        (Screen::ExitNode, Focus::Content) => match tui.country_list.handle_event(event)? {
            CountryListEvent::Select(node) => Some(Action::SelectCountry(node)),
        },
        (Screen::ExitNode, Focus::Buttons) => match tui.exit_node_buttons.handle_event(event)? {
            ButtonEvent::Pressed(0) => Some(Action::OpenTorrcScreen),
            ButtonEvent::Pressed(1) => Some(Action::ApplyExitNode),
            ButtonEvent::Pressed(_) => Some(Action::Quit),
        },
        (Screen::TorrcPath, Focus::Content) => match tui.path_input.handle_event(event)? {
            PathInputEvent::Submit(text) => Some(Action::SubmitTorrcPath(text)),
            PathInputEvent::ContentChanged => None,
        },
        (Screen::TorrcPath, Focus::Buttons) => match tui.torrc_buttons.handle_event(event)? {
            ButtonEvent::Pressed(0) => Some(Action::SubmitTorrcPath(tui.path_input.buffer.clone())),
            ButtonEvent::Pressed(1) => Some(cancel_torrc_edit(app, tui)),
            ButtonEvent::Pressed(_) => Some(Action::ShowExitNodeScreen),
        },
    }
}

/// Discards edits to the path input and leaves the torrc path screen.
fn cancel_torrc_edit(app: &App, tui: &mut TuiState) -> Action {
    tui.path_input.set(&app.torrc_display());
    Action::ShowExitNodeScreen
}

/// Applies an action and every effect it leads to, then fixes up TUI state.
fn dispatch(app: &mut App, tui: &mut TuiState, env: &EnvStore, action: Action) {
    debug!("Dispatching {:?}", action);
    let screen_before = app.screen;
    let current_before = app.current;

    let effect = update(app, action);
    run_effects(app, effect, env);

    if app.screen != screen_before {
        tui.focus = Focus::Content;
        if app.screen == Screen::TorrcPath {
            tui.path_input.set(&app.torrc_display());
        }
    }
    if app.current != current_before
        && let Some(node) = app.current
    {
        tui.country_list.highlight(node);
    }
}

/// Executes effects until one produces no follow-up.
fn run_effects(app: &mut App, mut effect: Effect, env: &EnvStore) {
    loop {
        let action = match effect {
            Effect::None | Effect::Quit => return,
            Effect::PatchTorrc { path, node } => Action::ExitNodeApplied {
                node,
                outcome: torrc::patch_node(&path, node),
            },
            Effect::SaveTorrcPath(path) => {
                let result = env
                    .save(TORRC_PATH_KEY, &path.to_string_lossy())
                    .map_err(|e| e.to_string());
                Action::TorrcPathSaved { path, result }
            }
            Effect::LoadCurrentCode(path) => {
                Action::CurrentCodeLoaded(torrc::read_current_code(&path))
            }
        };
        debug!("Effect produced {:?}", action);
        effect = update(app, action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::countries::NodeCode;
    use crate::test_support::{scratch_dir, test_app};
    use std::fs;

    #[test]
    fn test_tab_toggles_focus() {
        let app = test_app();
        let mut tui = TuiState::new("");
        assert_eq!(route_event(&app, &mut tui, &TuiEvent::FocusNext), None);
        assert_eq!(tui.focus, Focus::Buttons);
        route_event(&app, &mut tui, &TuiEvent::FocusPrev);
        assert_eq!(tui.focus, Focus::Content);
    }

    #[test]
    fn test_escape_quits_on_main_and_goes_back_on_path_screen() {
        let mut app = test_app();
        let mut tui = TuiState::new("");
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::Escape),
            Some(Action::Quit)
        );

        app.screen = Screen::TorrcPath;
        tui.path_input.set("half typed");
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::Escape),
            Some(Action::ShowExitNodeScreen)
        );
        assert_eq!(tui.path_input.buffer, "/tmp/exitto-test-torrc");
    }

    #[test]
    fn test_list_selection_becomes_action() {
        let app = test_app();
        let mut tui = TuiState::new("");
        route_event(&app, &mut tui, &TuiEvent::CursorDown);
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::Submit),
            Some(Action::SelectCountry(NodeCode::Fr))
        );
    }

    #[test]
    fn test_exit_node_buttons_map_to_actions() {
        let app = test_app();
        let mut tui = TuiState::new("");
        tui.focus = Focus::Buttons;
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::Submit),
            Some(Action::OpenTorrcScreen)
        );
        route_event(&app, &mut tui, &TuiEvent::CursorRight);
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::Submit),
            Some(Action::ApplyExitNode)
        );
        route_event(&app, &mut tui, &TuiEvent::CursorRight);
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::Submit),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_save_button_submits_buffer() {
        let mut app = test_app();
        app.screen = Screen::TorrcPath;
        let mut tui = TuiState::new("/etc/tor/torrc");
        tui.focus = Focus::Buttons;
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::Submit),
            Some(Action::SubmitTorrcPath("/etc/tor/torrc".to_string()))
        );
    }

    #[test]
    fn test_quit_from_anywhere() {
        let mut app = test_app();
        app.screen = Screen::TorrcPath;
        let mut tui = TuiState::new("");
        assert_eq!(route_event(&app, &mut tui, &TuiEvent::Quit), Some(Action::Quit));
    }

    #[test]
    fn test_select_and_apply_patches_torrc() {
        let dir = scratch_dir("tui-apply");
        let torrc = dir.join("torrc");
        fs::write(&torrc, "SocksPort 9050\nExitNodes {be}, {us}\n").unwrap();
        let env = EnvStore::bootstrap(dir.join(".env")).unwrap();

        let mut app = App::new(Some(torrc.clone()));
        let mut tui = TuiState::new("");
        dispatch(&mut app, &mut tui, &env, Action::SelectCountry(NodeCode::Ch));
        dispatch(&mut app, &mut tui, &env, Action::ApplyExitNode);

        assert_eq!(app.current, Some(NodeCode::Ch));
        assert_eq!(
            fs::read_to_string(&torrc).unwrap(),
            "SocksPort 9050\nExitNodes {ch}, {us}\n"
        );
        assert_eq!(tui.country_list.highlighted(), NodeCode::Ch);
    }

    #[test]
    fn test_saving_path_persists_and_loads_current_code() {
        let dir = scratch_dir("tui-save");
        let torrc = dir.join("torrc");
        fs::write(&torrc, "ExitNodes {jp}, {fr}\n").unwrap();
        let env = EnvStore::bootstrap(dir.join(".env")).unwrap();

        let mut app = App::new(None);
        app.screen = Screen::TorrcPath;
        let mut tui = TuiState::new("");
        dispatch(
            &mut app,
            &mut tui,
            &env,
            Action::SubmitTorrcPath(torrc.display().to_string()),
        );

        assert_eq!(app.torrc_file.as_deref(), Some(torrc.as_path()));
        assert_eq!(app.current, Some(NodeCode::Jp));
        assert_eq!(
            env.get(TORRC_PATH_KEY).as_deref(),
            Some(torrc.display().to_string().as_str())
        );
    }

    #[test]
    fn test_opening_path_screen_resets_focus_and_input() {
        let mut app = test_app();
        let dir = scratch_dir("tui-open");
        let env = EnvStore::bootstrap(dir.join(".env")).unwrap();
        let mut tui = TuiState::new("");
        tui.focus = Focus::Buttons;

        dispatch(&mut app, &mut tui, &env, Action::OpenTorrcScreen);

        assert_eq!(app.screen, Screen::TorrcPath);
        assert_eq!(tui.focus, Focus::Content);
        assert_eq!(tui.path_input.buffer, "/tmp/exitto-test-torrc");
    }
}
