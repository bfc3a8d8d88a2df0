//! # Core Application Logic
//!
//! This module contains exitto's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • torrc (file patch)   │
//!                    │  • countries (table)    │
//!                    │  • State + update()     │
//!                    └───────────┬─────────────┘
//!                                │
//!                   ┌────────────┴────────────┐
//!                   ▼                         ▼
//!            ┌────────────┐            ┌────────────┐
//!            │    TUI     │            │    CLI     │
//!            │  Adapter   │            │ (main.rs)  │
//!            │ (ratatui)  │            │            │
//!            └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`torrc`]: read and patch the `ExitNodes` directive
//! - [`countries`]: country name ↔ node code table
//! - [`env_store`]: the `.env` file remembering the torrc path
//! - [`config`]: layered settings
//! - [`state`]: the `App` struct holding all application state
//! - [`action`]: the `Action` enum and `update()` reducer

pub mod action;
mod atomic_file;
pub mod config;
pub mod countries;
pub mod env_store;
pub mod state;
pub mod torrc;
