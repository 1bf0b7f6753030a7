//! # trod
//!
//! MySQL field types and column DDL for the trod ORM.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on `trod` to
//! get everything, or on the individual crates for finer-grained control.

/// Errors, settings, settings loading and logging setup.
pub use trod_core as core;

/// Field declarations, column DDL rendering and predicates.
pub use trod_db as db;

/// Commonly used types, importable with `use trod::prelude::*`.
pub mod prelude {
    pub use trod_core::{Settings, TrodError, TrodResult};
    pub use trod_db::{
        columns_sql, Condition, Field, FieldError, FieldResult, Operator, Precision,
        TimestampAuto, Value, Where,
    };
}

/// Re-exported third-party crates.
pub mod reexports {
    pub use chrono;
    pub use tracing;
}
