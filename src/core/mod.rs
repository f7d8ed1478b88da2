//! # Core Application Logic
//!
//! This module contains parley's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                                ▼
//!                    ┌─────────────────────────┐
//!                    │   TUI adapter (ratatui) │
//!                    │   spawns turn workers   │
//!                    └─────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`turn`]: The worker that drives one streamed response
//! - [`config`]: Layered TOML/env/CLI configuration

pub mod action;
pub mod config;
pub mod conversation;
pub mod input;
pub mod state;
pub mod stream;
pub mod summary;
pub mod turn;
