//! Predicates built from fields and their composition.
//!
//! - [`predicate`] - [`Operator`] and the [`Where`] triple produced by fields
//! - [`condition`] - [`Condition`] for combining predicates with AND, OR and NOT

pub mod condition;
pub mod predicate;

pub use condition::Condition;
pub use predicate::{Operator, Where};
