//! # TUI Components
//!
//! UI components for the two screens.
//!
//! ## Stateless Components (Props-Based Rendering)
//!
//! Built fresh each frame from the data they display:
//! - `TitleBar`: centered screen title
//! - `StatusBar`: "label: value" plus the last feedback message
//!
//! ## Stateful Components (Event-Driven)
//!
//! Live in `TuiState`, keep local state and emit events:
//! - `CountryList`: radio list of exit-node countries
//! - `PathInput`: single-line torrc path editor
//! - `ButtonBar`: row of buttons under the screen content
//!
//! Components never touch `App`; the event loop turns their events into
//! `core::action::Action` values.
//!
//! ## Screen Composition
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │            TitleBar                  │
//! │                                      │
//! │      CountryList  |  PathInput       │
//! │                                      │
//! │  [ButtonBar] [ButtonBar] [ButtonBar] │
//! │                                      │
//! │ StatusBar                            │
//! └──────────────────────────────────────┘
//! ```

pub mod button_bar;
pub mod country_list;
pub mod path_input;
mod status_bar;
mod title_bar;

pub use button_bar::{ButtonBar, ButtonEvent};
pub use country_list::{CountryList, CountryListEvent};
pub use path_input::{PathInput, PathInputEvent};
pub use status_bar::StatusBar;
pub use title_bar::TitleBar;
