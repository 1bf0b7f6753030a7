//! Field type definitions.
//!
//! Each [`FieldType`] variant is one MySQL column family and carries the
//! options that family understands. [`Field`] wraps a type with the metadata
//! shared by every column (name, nullability, default, comment) and exposes a
//! builder API for declaring fields.

use std::fmt;
use std::str::FromStr;

use crate::fields::error::{FieldError, FieldResult};
use crate::value::Value;

/// Integer column widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum IntegerKind {
    /// `tinyint`
    Tinyint,
    /// `smallint`
    Smallint,
    /// `int`
    Int,
    /// `bigint`
    Bigint,
}

impl IntegerKind {
    /// The MySQL type keyword.
    pub const fn db_type(self) -> &'static str {
        match self {
            Self::Tinyint => "tinyint",
            Self::Smallint => "smallint",
            Self::Int => "int",
            Self::Bigint => "bigint",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Tinyint => "Tinyint",
            Self::Smallint => "Smallint",
            Self::Int => "Int",
            Self::Bigint => "Bigint",
        }
    }

    /// Only `int` and `bigint` columns may be declared as primary keys.
    pub const fn allows_primary_key(self) -> bool {
        matches!(self, Self::Int | Self::Bigint)
    }
}

/// Approximate and fixed-point numeric column kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RealKind {
    /// `float`
    Float,
    /// `double`
    Double,
    /// `decimal`
    Decimal,
}

impl RealKind {
    /// The MySQL type keyword.
    pub const fn db_type(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Decimal => "Decimal",
        }
    }
}

/// Display width and number of decimals of a real column, `(M,D)` in MySQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Precision {
    /// Total number of digits.
    pub length: u32,
    /// Digits after the decimal point.
    pub decimals: u32,
}

impl Precision {
    /// Creates a precision from its two parts.
    pub const fn new(length: u32, decimals: u32) -> Self {
        Self { length, decimals }
    }

    /// Builds a precision from a loosely specified list of lengths.
    ///
    /// Two items map to `(length, decimals)`. Any other non-empty list is
    /// accepted with a warning, using the first item as the length and the
    /// last as the decimals.
    pub fn from_slice(items: &[u32]) -> FieldResult<Self> {
        match items {
            [] => Err(FieldError::InvalidPrecision(
                "at least one length is required".to_string(),
            )),
            [length, decimals] => Ok(Self::new(*length, *decimals)),
            [length, rest @ ..] => {
                tracing::warn!(lengths = ?items, "length format error, expected (length, decimals)");
                let decimals = rest.last().unwrap_or(length);
                Ok(Self::new(*length, *decimals))
            }
        }
    }
}

impl From<(u32, u32)> for Precision {
    fn from((length, decimals): (u32, u32)) -> Self {
        Self::new(length, decimals)
    }
}

/// Automatic value maintenance of a `timestamp` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampAuto {
    /// Set to the current time when the row is inserted.
    OnCreate,
    /// Set on insert and refreshed on every update.
    OnUpdate,
}

impl TimestampAuto {
    /// The textual form accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnCreate => "on_create",
            Self::OnUpdate => "on_update",
        }
    }

    /// The DEFAULT clause MySQL needs for this behaviour.
    pub const fn default_clause(self) -> &'static str {
        match self {
            Self::OnCreate => "DEFAULT CURRENT_TIMESTAMP",
            Self::OnUpdate => "DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP",
        }
    }
}

impl FromStr for TimestampAuto {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_create" => Ok(Self::OnCreate),
            "on_update" => Ok(Self::OnUpdate),
            other => Err(FieldError::InvalidAuto(other.to_string())),
        }
    }
}

impl fmt::Display for TimestampAuto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The type of a field, determining its SQL column type and options.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum FieldType {
    /// `tinyint`, `smallint`, `int` or `bigint`.
    Integer {
        /// Column width.
        kind: IntegerKind,
        /// Display length, `int(11)`.
        length: u32,
        /// Whether the column is `unsigned`.
        unsigned: bool,
        /// Whether the column is the primary key.
        primary_key: bool,
    },
    /// `text`. Never carries a default.
    Text {
        /// Optional character set.
        encoding: Option<String>,
    },
    /// `char` or `varchar`.
    Char {
        /// Maximum length in characters.
        length: u32,
        /// Use `varchar` instead of `char`.
        varchar: bool,
        /// Optional character set.
        encoding: Option<String>,
    },
    /// `float`, `double` or `decimal`.
    Real {
        /// Column kind.
        kind: RealKind,
        /// `(M,D)` of the column.
        precision: Precision,
        /// Whether the column is `unsigned`.
        unsigned: bool,
    },
    /// `datetime`.
    Datetime,
    /// `timestamp`, optionally maintained by the server.
    Timestamp {
        /// Automatic value maintenance.
        auto: Option<TimestampAuto>,
    },
}

impl FieldType {
    /// The public name of the column kind (e.g. "Bigint", "String").
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer { kind, .. } => kind.name(),
            Self::Text { .. } => "Text",
            Self::Char { .. } => "String",
            Self::Real { kind, .. } => kind.name(),
            Self::Datetime => "Datetime",
            Self::Timestamp { .. } => "Timestamp",
        }
    }

    /// The MySQL type keyword, without length or modifiers.
    pub const fn db_type(&self) -> &'static str {
        match self {
            Self::Integer { kind, .. } => kind.db_type(),
            Self::Text { .. } => "text",
            Self::Char { varchar: true, .. } => "varchar",
            Self::Char { varchar: false, .. } => "char",
            Self::Real { kind, .. } => kind.db_type(),
            Self::Datetime => "datetime",
            Self::Timestamp { .. } => "timestamp",
        }
    }

    /// Returns `true` for `datetime` and `timestamp` columns.
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::Datetime | Self::Timestamp { .. })
    }
}

/// Complete definition of a model field.
///
/// Fields start out nullable, without a default and with an empty comment.
/// Builder methods that do not apply to the field's kind are remembered and
/// reported by [`validate`](Field::validate), so a declaration reads top to
/// bottom and fails once, at render time. Everything else is checked against
/// the field's current state, including edits made through the public fields.
///
/// # Examples
///
/// ```
/// use trod_db::fields::Field;
///
/// let age = Field::tinyint(4)
///     .unsigned()
///     .not_null()
///     .default(0)
///     .comment("age")
///     .name("age");
/// assert_eq!(
///     age.build().unwrap(),
///     "tinyint(4) unsigned NOT NULL DEFAULT 0 COMMENT 'age'"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// The column name. Usually assigned by the model layer.
    pub name: Option<String>,
    /// The type of this field.
    pub field_type: FieldType,
    /// Whether NULL is allowed in the database.
    pub allow_null: bool,
    /// Default value for the column.
    pub default: Option<Value>,
    /// Column comment.
    pub comment: String,
    misuse: Vec<FieldError>,
}

impl Field {
    /// Creates a nullable field of the given type with no default.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            name: None,
            field_type,
            allow_null: true,
            default: None,
            comment: String::new(),
            misuse: Vec::new(),
        }
    }

    fn integer(kind: IntegerKind, length: u32) -> Self {
        Self::new(FieldType::Integer {
            kind,
            length,
            unsigned: false,
            primary_key: false,
        })
    }

    fn real(kind: RealKind, precision: impl Into<Precision>) -> Self {
        Self::new(FieldType::Real {
            kind,
            precision: precision.into(),
            unsigned: false,
        })
    }

    /// `tinyint(length)`
    pub fn tinyint(length: u32) -> Self {
        Self::integer(IntegerKind::Tinyint, length)
    }

    /// `smallint(length)`
    pub fn smallint(length: u32) -> Self {
        Self::integer(IntegerKind::Smallint, length)
    }

    /// `int(length)`
    pub fn int(length: u32) -> Self {
        Self::integer(IntegerKind::Int, length)
    }

    /// `bigint(length)`
    pub fn bigint(length: u32) -> Self {
        Self::integer(IntegerKind::Bigint, length)
    }

    /// `text`
    pub fn text() -> Self {
        Self::new(FieldType::Text { encoding: None })
    }

    /// `char(length)`
    pub fn string(length: u32) -> Self {
        Self::new(FieldType::Char {
            length,
            varchar: false,
            encoding: None,
        })
    }

    /// `varchar(length)`
    pub fn varchar(length: u32) -> Self {
        Self::string(length).use_varchar()
    }

    /// `float(M,D)`
    pub fn float(precision: impl Into<Precision>) -> Self {
        Self::real(RealKind::Float, precision)
    }

    /// `double(M,D)`
    pub fn double(precision: impl Into<Precision>) -> Self {
        Self::real(RealKind::Double, precision)
    }

    /// `decimal(M,D)`
    pub fn decimal(precision: impl Into<Precision>) -> Self {
        Self::real(RealKind::Decimal, precision)
    }

    /// `datetime`
    pub fn datetime() -> Self {
        Self::new(FieldType::Datetime)
    }

    /// `timestamp`
    pub fn timestamp() -> Self {
        Self::new(FieldType::Timestamp { auto: None })
    }

    // ── Builder ──────────────────────────────────────────────────────

    /// Sets the column name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the column comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Allows or forbids NULL values.
    #[must_use]
    pub fn nullable(mut self, allow_null: bool) -> Self {
        self.allow_null = allow_null;
        self
    }

    /// Shorthand for `nullable(false)`.
    #[must_use]
    pub fn not_null(self) -> Self {
        self.nullable(false)
    }

    /// Sets the column default. `Value::Null` clears it.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.default = (!value.is_null()).then_some(value);
        self
    }

    /// Marks a numeric column as `unsigned`.
    #[must_use]
    pub fn unsigned(mut self) -> Self {
        match &mut self.field_type {
            FieldType::Integer { unsigned, .. } | FieldType::Real { unsigned, .. } => {
                *unsigned = true;
            }
            _ => self.unsupported("unsigned"),
        }
        self
    }

    /// Marks an `int` or `bigint` column as the primary key.
    ///
    /// A primary key is never NULL and has no default; a default set earlier
    /// is dropped with a warning.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        let eligible = matches!(
            self.field_type,
            FieldType::Integer { kind, .. } if kind.allows_primary_key()
        );
        if !eligible {
            self.unsupported("primary_key");
            return self;
        }
        if let FieldType::Integer { primary_key, .. } = &mut self.field_type {
            *primary_key = true;
        }
        if self.allow_null {
            tracing::warn!(
                field = self.display_name(),
                "primary key cannot be nullable, using NOT NULL"
            );
            self.allow_null = false;
        }
        if let Some(dropped) = self.default.take() {
            tracing::warn!(
                field = self.display_name(),
                default = %dropped,
                "primary key cannot have a default, dropping it"
            );
        }
        self
    }

    /// Uses `varchar` instead of `char` for a string column.
    #[must_use]
    pub fn use_varchar(mut self) -> Self {
        match &mut self.field_type {
            FieldType::Char { varchar, .. } => *varchar = true,
            _ => self.unsupported("use_varchar"),
        }
        self
    }

    /// Sets the character set of a text or string column.
    #[must_use]
    pub fn encoding(mut self, charset: impl Into<String>) -> Self {
        match &mut self.field_type {
            FieldType::Text { encoding } | FieldType::Char { encoding, .. } => {
                *encoding = Some(charset.into());
            }
            _ => self.unsupported("encoding"),
        }
        self
    }

    /// Lets the server maintain a timestamp column.
    #[must_use]
    pub fn auto(mut self, auto: TimestampAuto) -> Self {
        match &mut self.field_type {
            FieldType::Timestamp { auto: slot } => *slot = Some(auto),
            _ => self.unsupported("auto"),
        }
        self
    }

    fn unsupported(&mut self, option: &'static str) {
        let kind = self.kind_name();
        self.misuse
            .push(FieldError::UnsupportedOption { kind, option });
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The public name of the column kind.
    pub const fn kind_name(&self) -> &'static str {
        self.field_type.kind_name()
    }

    /// Returns `true` if this field is the primary key.
    pub const fn is_primary_key(&self) -> bool {
        matches!(
            self.field_type,
            FieldType::Integer {
                primary_key: true,
                ..
            }
        )
    }

    /// The column name, or [`FieldError::Unnamed`].
    pub fn column_name(&self) -> FieldResult<&str> {
        self.name.as_deref().ok_or(FieldError::Unnamed)
    }

    pub(crate) fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    /// The current local time for `datetime` and `timestamp` fields.
    pub fn now(&self) -> Option<Value> {
        self.field_type
            .is_temporal()
            .then(|| Value::DateTime(chrono::Local::now().naive_local()))
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Checks the declaration: inapplicable options, primary key conflicts and
    /// the type of the default value.
    pub fn validate(&self) -> FieldResult<()> {
        if let Some(err) = self.misuse.first() {
            return Err(err.clone());
        }
        if self.is_primary_key() {
            if self.allow_null {
                return Err(FieldError::PrimaryKeyConflict("nullable"));
            }
            if self.default.is_some() {
                return Err(FieldError::PrimaryKeyConflict("given a default"));
            }
        }
        self.checked_default().map(|_| ())
    }

    /// Returns the default coerced to the value kind the column stores.
    pub(crate) fn checked_default(&self) -> FieldResult<Option<Value>> {
        let Some(default) = &self.default else {
            return Ok(None);
        };
        let kind = self.kind_name();
        let mismatch = |expected: &'static str| FieldError::DefaultType {
            kind,
            expected,
            found: format!("{} `{default}`", default.kind_name()),
        };

        let value = match (&self.field_type, default) {
            (FieldType::Integer { .. }, Value::Int(_)) => default.clone(),
            (FieldType::Integer { .. }, Value::Bool(b)) => Value::Int(i64::from(*b)),
            (FieldType::Integer { .. }, _) => return Err(mismatch("int")),

            (FieldType::Real { .. }, Value::Float(f)) if f.is_finite() => default.clone(),
            (FieldType::Real { .. }, Value::Int(i)) => Value::Float(*i as f64),
            (FieldType::Real { .. }, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float)
                .ok_or_else(|| mismatch("float"))?,
            (FieldType::Real { .. }, _) => return Err(mismatch("float")),

            (FieldType::Char { .. }, Value::String(_)) => default.clone(),
            (FieldType::Char { .. }, _) => return Err(mismatch("string")),

            (FieldType::Datetime | FieldType::Timestamp { .. }, Value::DateTime(_)) => {
                default.clone()
            }
            (FieldType::Datetime | FieldType::Timestamp { .. }, _) => {
                return Err(mismatch("datetime"))
            }

            (FieldType::Text { .. }, _) => {
                return Err(FieldError::UnsupportedOption {
                    kind,
                    option: "default",
                })
            }
        };
        Ok(Some(value))
    }
}
