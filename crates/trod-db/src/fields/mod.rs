//! Field definitions and their MySQL column rendering.
//!
//! [`Field`] pairs a [`FieldType`] with column metadata. The [`ddl`] module
//! renders fields into column-definition fragments, and predicates built from
//! fields live in [`crate::query`].

pub mod ddl;
pub mod error;
pub mod types;

pub use ddl::columns_sql;
pub use error::{FieldError, FieldResult};
pub use types::{Field, FieldType, IntegerKind, Precision, RealKind, TimestampAuto};
