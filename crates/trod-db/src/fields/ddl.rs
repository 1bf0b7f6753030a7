//! MySQL column-definition rendering.
//!
//! A rendered field is the text that follows the column name in a
//! `CREATE TABLE` body: the type, optional character set, nullability, default
//! and comment, in that order.

use std::fmt;

use trod_core::logging::ddl_span;
use trod_core::settings::{Settings, SETTINGS};

use crate::fields::error::FieldResult;
use crate::fields::types::{Field, FieldType};
use crate::value::Value;

/// Quotes a string literal for MySQL.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''"))
}

/// Quotes an identifier, doubling embedded backticks.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Formats a float so integral values keep a fractional digit (`3.0`).
fn float_literal(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

fn default_literal(value: &Value) -> String {
    match value {
        Value::Null | Value::List(_) => "NULL".to_string(),
        Value::Bool(b) => i64::from(*b).to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => float_literal(*f),
        Value::String(s) => quote(s),
        Value::DateTime(dt) => quote(&dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
    }
}

fn with_unsigned(type_sql: String, unsigned: bool) -> String {
    if unsigned {
        format!("{type_sql} unsigned")
    } else {
        type_sql
    }
}

impl Field {
    /// Renders the column type, e.g. `int(11) unsigned` or `varchar(64)`.
    pub fn build_type(&self) -> String {
        let db_type = self.field_type.db_type();
        match &self.field_type {
            FieldType::Integer {
                length, unsigned, ..
            } => with_unsigned(format!("{db_type}({length})"), *unsigned),
            FieldType::Char { length, .. } => format!("{db_type}({length})"),
            FieldType::Real {
                precision,
                unsigned,
                ..
            } => with_unsigned(
                format!("{db_type}({},{})", precision.length, precision.decimals),
                *unsigned,
            ),
            FieldType::Text { .. } | FieldType::Datetime | FieldType::Timestamp { .. } => {
                db_type.to_string()
            }
        }
    }

    /// Renders the clauses that follow the type.
    ///
    /// Uses the global [`SETTINGS`] when they have been configured.
    pub fn build_stmt(&self) -> FieldResult<Vec<String>> {
        match SETTINGS.try_get() {
            Some(settings) => self.build_stmt_with(settings),
            None => self.stmt(None),
        }
    }

    /// Like [`build_stmt`](Field::build_stmt), falling back to the configured
    /// default character set for text columns without an explicit encoding.
    pub fn build_stmt_with(&self, settings: &Settings) -> FieldResult<Vec<String>> {
        self.stmt(settings.default_charset.as_deref())
    }

    fn stmt(&self, fallback_charset: Option<&str>) -> FieldResult<Vec<String>> {
        self.validate()?;
        let default = self.checked_default()?;
        let mut stmt = Vec::new();

        let charset = match &self.field_type {
            FieldType::Text { encoding } | FieldType::Char { encoding, .. } => {
                encoding.as_deref().or(fallback_charset)
            }
            _ => None,
        };
        if let Some(charset) = charset {
            stmt.push(format!("CHARACTER SET {charset}"));
        }

        let allow_null = self.allow_null && !self.is_primary_key();
        stmt.push(if allow_null { "NULL" } else { "NOT NULL" }.to_string());

        let auto = match &self.field_type {
            FieldType::Timestamp { auto } => *auto,
            _ => None,
        };
        match (auto, default) {
            (Some(auto), _) => stmt.push(auto.default_clause().to_string()),
            (None, Some(value)) => stmt.push(format!("DEFAULT {}", default_literal(&value))),
            (None, None) => {
                let exempt =
                    self.is_primary_key() || matches!(self.field_type, FieldType::Text { .. });
                if !allow_null && !exempt {
                    tracing::warn!(
                        field = self.display_name(),
                        "no default value given for NOT NULL field"
                    );
                }
            }
        }

        stmt.push(format!("COMMENT {}", quote(&self.comment)));
        Ok(stmt)
    }

    /// Renders the full column definition without the column name.
    pub fn build(&self) -> FieldResult<String> {
        Ok(self.join(self.build_stmt()?))
    }

    /// Like [`build`](Field::build) with settings applied.
    pub fn build_with(&self, settings: &Settings) -> FieldResult<String> {
        Ok(self.join(self.build_stmt_with(settings)?))
    }

    fn join(&self, stmt: Vec<String>) -> String {
        let mut parts = Vec::with_capacity(stmt.len() + 1);
        parts.push(self.build_type());
        parts.extend(stmt);
        parts.join(" ")
    }

    /// Renders `` `name` <definition> ``. The field must be named.
    pub fn column_sql(&self) -> FieldResult<String> {
        Ok(format!(
            "{} {}",
            quote_ident(self.column_name()?),
            self.build()?
        ))
    }

    /// Like [`column_sql`](Field::column_sql) with settings applied.
    pub fn column_sql_with(&self, settings: &Settings) -> FieldResult<String> {
        Ok(format!(
            "{} {}",
            quote_ident(self.column_name()?),
            self.build_with(settings)?
        ))
    }

    /// The implicit auto-increment primary key and its column name, taken from
    /// the global [`SETTINGS`] when configured.
    ///
    /// ```
    /// use trod_db::fields::Field;
    ///
    /// let (sql, column) = Field::build_default_id();
    /// assert_eq!(column, "id");
    /// assert!(sql.starts_with("`id` bigint(45) unsigned NOT NULL AUTO_INCREMENT"));
    /// ```
    pub fn build_default_id() -> (String, String) {
        SETTINGS.try_get().map_or_else(
            || Self::default_id_with(&Settings::default()),
            Self::default_id_with,
        )
    }

    /// The implicit primary key using the configured column name and comment.
    pub fn default_id_with(settings: &Settings) -> (String, String) {
        let id = &settings.default_id;
        (
            format!(
                "{} bigint(45) unsigned NOT NULL AUTO_INCREMENT COMMENT {}",
                quote_ident(&id.column),
                quote(&id.comment)
            ),
            id.column.clone(),
        )
    }
}

/// Renders every column of a table, the implicit primary key first.
///
/// The implicit key is skipped when one of the fields is already a primary key.
pub fn columns_sql(table: &str, fields: &[Field], settings: &Settings) -> FieldResult<Vec<String>> {
    let span = ddl_span(table);
    let _guard = span.enter();

    let mut columns = Vec::with_capacity(fields.len() + 1);
    if !fields.iter().any(Field::is_primary_key) {
        columns.push(Field::default_id_with(settings).0);
    }
    for field in fields {
        columns.push(field.column_sql_with(settings)?);
    }
    tracing::debug!(count = columns.len(), "rendered column definitions");
    Ok(columns)
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{} ({}: {})>",
            self.kind_name(),
            self.display_name(),
            self.comment
        )
    }
}
