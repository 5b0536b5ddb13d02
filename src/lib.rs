//! HTTP backend for Notebook.
//!
//! The domain lives in `notebook-core`; this crate wires it to an axum router
//! and a command-line configuration.

pub mod api;
pub mod config;
pub mod state;

pub use config::{AppConfig, Backend};
pub use state::AppState;
