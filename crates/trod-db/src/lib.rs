//! # trod-db
//!
//! Field definitions for the trod ORM. A [`Field`](fields::Field) describes one
//! MySQL column and renders it into the column-definition fragment used in
//! `CREATE TABLE`, and into [`Where`](query::Where) predicates consumed by the
//! query builder.
//!
//! ## Module Overview
//!
//! - [`fields`] - Column kinds, field declarations, validation and DDL rendering
//! - [`value`] - The [`Value`](value::Value) enum for defaults and parameters
//! - [`query`] - Comparison predicates and their composition

// These clippy lints are intentionally allowed for this crate:
// - should_implement_trait: `Field::eq` and friends build predicates, not booleans
// - cast_precision_loss: integer defaults on real columns are widened to f64
// - format_push_string: format! with push_str is clearer than write! for SQL generation
// - return_self_not_must_use: builder pattern methods are self-documenting
#![allow(clippy::should_implement_trait)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::format_push_string)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::float_cmp)]
#![allow(clippy::doc_markdown)]

pub mod fields;
pub mod query;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use fields::{columns_sql, Field, FieldError, FieldResult, FieldType, Precision, TimestampAuto};
pub use query::{Condition, Operator, Where};
pub use value::Value;
