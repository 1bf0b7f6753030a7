//! Errors raised while validating or rendering a field.

use thiserror::Error;
use trod_core::TrodError;

/// A field definition that cannot be rendered as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// An option was applied to a column kind that has no such option.
    #[error("{kind} field does not support `{option}`")]
    UnsupportedOption {
        /// The column kind (e.g. "Text").
        kind: &'static str,
        /// The offending option (e.g. "default").
        option: &'static str,
    },

    /// A primary key was made nullable or given a default.
    #[error("primary key field cannot be {0}")]
    PrimaryKeyConflict(&'static str),

    /// The default value does not match the column kind.
    #[error("{kind} field expects a default of type {expected}, found {found}")]
    DefaultType {
        /// The column kind.
        kind: &'static str,
        /// The accepted value kind.
        expected: &'static str,
        /// The value that was supplied.
        found: String,
    },

    /// A float precision could not be built from the supplied lengths.
    #[error("invalid precision: {0}")]
    InvalidPrecision(String),

    /// A timestamp `auto` value other than `on_create` or `on_update`.
    #[error("auto must be 'on_create' or 'on_update', got '{0}'")]
    InvalidAuto(String),

    /// The operation needs a column name and the field has none.
    #[error("field has no column name")]
    Unnamed,

    /// A predicate whose operator and value have no SQL form.
    #[error("cannot render `{operator}` predicate on `{column}`: {reason}")]
    Unrenderable {
        /// The compared column.
        column: String,
        /// The operator symbol (e.g. "exists").
        operator: &'static str,
        /// What is missing.
        reason: &'static str,
    },
}

/// A convenience type alias for `Result<T, FieldError>`.
pub type FieldResult<T> = Result<T, FieldError>;

impl From<FieldError> for TrodError {
    fn from(err: FieldError) -> Self {
        Self::Field(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_option_display() {
        let err = FieldError::UnsupportedOption {
            kind: "Text",
            option: "default",
        };
        assert_eq!(err.to_string(), "Text field does not support `default`");
    }

    #[test]
    fn test_default_type_display() {
        let err = FieldError::DefaultType {
            kind: "Int",
            expected: "int",
            found: "string 'abc'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Int field expects a default of type int, found string 'abc'"
        );
    }

    #[test]
    fn test_unrenderable_display() {
        let err = FieldError::Unrenderable {
            column: "id".to_string(),
            operator: "exists",
            reason: "EXISTS takes a subquery",
        };
        assert_eq!(
            err.to_string(),
            "cannot render `exists` predicate on `id`: EXISTS takes a subquery"
        );
    }

    #[test]
    fn test_into_trod_error() {
        let err: TrodError = FieldError::Unnamed.into();
        assert!(err.is_field_error());
        assert_eq!(err.to_string(), "Field error: field has no column name");
    }
}
