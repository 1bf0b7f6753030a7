//! Core error types for trod.
//!
//! [`TrodError`] is the top-level error surfaced to callers. Lower layers keep
//! their own typed errors (for example the field validation errors in
//! `trod-db`) and convert into it at the crate boundary.

use thiserror::Error;

/// The primary error type for trod.
#[derive(Error, Debug)]
pub enum TrodError {
    // ── Schema ───────────────────────────────────────────────────────

    /// A field definition is invalid or cannot be rendered.
    #[error("Field error: {0}")]
    Field(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TrodError {
    /// Returns `true` if the error originates from a field definition.
    pub const fn is_field_error(&self) -> bool {
        matches!(self, Self::Field(_))
    }
}

/// A convenience type alias for `Result<T, TrodError>`.
pub type TrodResult<T> = Result<T, TrodError>;
