//! # trod-core
//!
//! Core types for trod: errors, settings, settings loading and logging setup.
//! This crate has no dependency on the schema layer and is shared by every
//! other trod crate.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Settings and the global configuration slot
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{TrodError, TrodResult};
pub use settings::{DefaultIdSettings, Settings, SETTINGS};
