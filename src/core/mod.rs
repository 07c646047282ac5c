//! # Core Application Logic
//!
//! This module contains gemchat's business logic.
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
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │   Store    │      │ Inference  │
//!     │  Adapter   │      │ (on disk)  │      │  (HTTP)    │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`transcript`]: Messages and the ordered transcript
//! - [`reveal`]: Word-by-word reply disclosure
//! - [`store`]: Persistent key/value storage
//! - [`config`]: Settings resolution

pub mod action;
pub mod config;
pub mod reveal;
pub mod state;
pub mod store;
pub mod transcript;
