//! Comparison predicates built from fields.
//!
//! A [`Where`] is a `(column, operator, value)` triple handed to the query
//! builder. Fields produce them through [`Field::eq`], [`Field::in_`] and
//! friends, and [`Where::to_sql`] renders one into a MySQL fragment with `?`
//! placeholders.
//!
//! # Examples
//!
//! ```
//! use trod_db::fields::Field;
//!
//! let id = Field::bigint(20).name("id");
//! let (sql, params) = id.in_([1, 2, 3]).unwrap().to_sql().unwrap();
//! assert_eq!(sql, "`id` IN (?, ?, ?)");
//! assert_eq!(params.len(), 3);
//! ```

use std::fmt;

use crate::fields::ddl::quote_ident;
use crate::fields::{Field, FieldError, FieldResult};
use crate::value::Value;

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Membership in a list.
    In,
    /// Existence in a list.
    Exists,
    /// Pattern match.
    Like,
}

impl Operator {
    /// The operator token understood by the query builder.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::In => "in",
            Self::Exists => "exists",
            Self::Like => "like",
        }
    }

    /// The MySQL operator.
    pub const fn sql_keyword(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::In => "IN",
            Self::Exists => "EXISTS",
            Self::Like => "LIKE",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single column comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Where {
    /// The column being compared.
    pub column: String,
    /// The comparison.
    pub operator: Operator,
    /// The right-hand side.
    pub value: Value,
}

impl Where {
    /// Creates a predicate.
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Renders the predicate with `?` placeholders.
    ///
    /// `exists` predicates are handed to the query builder as-is; MySQL's
    /// `EXISTS` takes a subquery, so they have no standalone rendering. A list
    /// value is only accepted by `in`.
    pub fn to_sql(&self) -> FieldResult<(String, Vec<Value>)> {
        let mut sql = String::new();
        let mut params = Vec::new();
        self.compile(&mut sql, &mut params)?;
        Ok((sql, params))
    }

    pub(crate) fn compile(&self, sql: &mut String, params: &mut Vec<Value>) -> FieldResult<()> {
        let column = quote_ident(&self.column);
        let keyword = self.operator.sql_keyword();
        match (self.operator, &self.value) {
            (Operator::Exists, _) => return Err(self.unrenderable("EXISTS takes a subquery")),
            (Operator::Eq, Value::Null) => sql.push_str(&format!("{column} IS NULL")),
            (Operator::Ne, Value::Null) => sql.push_str(&format!("{column} IS NOT NULL")),
            (Operator::In, value) => {
                let items = match value {
                    Value::List(items) => items.clone(),
                    other => vec![other.clone()],
                };
                // An empty list must still be valid SQL and match nothing.
                let placeholders = if items.is_empty() {
                    "NULL".to_string()
                } else {
                    vec!["?"; items.len()].join(", ")
                };
                params.extend(items);
                sql.push_str(&format!("{column} {keyword} ({placeholders})"));
            }
            (_, Value::List(_)) => {
                return Err(self.unrenderable("a list can only be compared with `in`"))
            }
            (_, value) => {
                params.push(value.clone());
                sql.push_str(&format!("{column} {keyword} ?"));
            }
        }
        Ok(())
    }

    fn unrenderable(&self, reason: &'static str) -> FieldError {
        FieldError::Unrenderable {
            column: self.column.clone(),
            operator: self.operator.symbol(),
            reason,
        }
    }
}

impl fmt::Display for Where {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.value)
    }
}

impl Field {
    fn predicate(&self, operator: Operator, value: Value) -> FieldResult<Where> {
        Ok(Where::new(self.column_name()?, operator, value))
    }

    /// `column == value`
    pub fn eq(&self, value: impl Into<Value>) -> FieldResult<Where> {
        self.predicate(Operator::Eq, value.into())
    }

    /// `column != value`
    pub fn ne(&self, value: impl Into<Value>) -> FieldResult<Where> {
        self.predicate(Operator::Ne, value.into())
    }

    /// `column > value`
    pub fn gt(&self, value: impl Into<Value>) -> FieldResult<Where> {
        self.predicate(Operator::Gt, value.into())
    }

    /// `column >= value`
    pub fn ge(&self, value: impl Into<Value>) -> FieldResult<Where> {
        self.predicate(Operator::Ge, value.into())
    }

    /// `column < value`
    pub fn lt(&self, value: impl Into<Value>) -> FieldResult<Where> {
        self.predicate(Operator::Lt, value.into())
    }

    /// `column <= value`
    pub fn le(&self, value: impl Into<Value>) -> FieldResult<Where> {
        self.predicate(Operator::Le, value.into())
    }

    /// `column in values`, e.g. removing rows whose id is in `[1, 2, 3]`.
    pub fn in_<I, V>(&self, values: I) -> FieldResult<Where>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.predicate(Operator::In, Value::list(values))
    }

    /// `column exists values`. Same shape as [`in_`](Field::in_), but left to
    /// the query builder: [`Where::to_sql`] refuses it.
    pub fn exists<I, V>(&self, values: I) -> FieldResult<Where>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.predicate(Operator::Exists, Value::list(values))
    }

    /// `column like pattern`
    pub fn like(&self, pattern: impl Into<Value>) -> FieldResult<Where> {
        self.predicate(Operator::Like, pattern.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age() -> Field {
        Field::tinyint(3).unsigned().name("age")
    }

    #[test]
    fn test_comparison_operators() {
        let f = age();
        let cases = [
            (f.eq(18).unwrap(), Operator::Eq),
            (f.ne(18).unwrap(), Operator::Ne),
            (f.gt(18).unwrap(), Operator::Gt),
            (f.ge(18).unwrap(), Operator::Ge),
            (f.lt(18).unwrap(), Operator::Lt),
            (f.le(18).unwrap(), Operator::Le),
        ];
        for (predicate, operator) in cases {
            assert_eq!(predicate, Where::new("age", operator, 18));
        }
    }

    #[test]
    fn test_in_and_exists_collect_lists() {
        let id = Field::bigint(20).name("id");
        assert_eq!(
            id.in_([1, 2, 3]).unwrap().value,
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        assert_eq!(id.exists(vec![7_i64]).unwrap().operator, Operator::Exists);
    }

    #[test]
    fn test_like() {
        let name = Field::varchar(32).name("name");
        assert_eq!(
            name.like("ali%").unwrap(),
            Where::new("name", Operator::Like, "ali%")
        );
    }

    #[test]
    fn test_unnamed_field_cannot_compare() {
        assert_eq!(Field::int(11).eq(1), Err(FieldError::Unnamed));
        assert_eq!(Field::int(11).in_([1]), Err(FieldError::Unnamed));
    }

    #[test]
    fn test_operator_tokens() {
        assert_eq!(Operator::Eq.symbol(), "==");
        assert_eq!(Operator::Eq.sql_keyword(), "=");
        assert_eq!(Operator::In.symbol(), "in");
        assert_eq!(Operator::In.sql_keyword(), "IN");
        assert_eq!(Operator::Like.to_string(), "like");
    }

    #[test]
    fn test_to_sql_scalar() {
        let (sql, params) = age().ge(18).unwrap().to_sql().unwrap();
        assert_eq!(sql, "`age` >= ?");
        assert_eq!(params, vec![Value::Int(18)]);
    }

    #[test]
    fn test_to_sql_null() {
        let (sql, params) = age().eq(Value::Null).unwrap().to_sql().unwrap();
        assert_eq!(sql, "`age` IS NULL");
        assert!(params.is_empty());

        let (sql, _) = age().ne(Option::<i64>::None).unwrap().to_sql().unwrap();
        assert_eq!(sql, "`age` IS NOT NULL");
    }

    #[test]
    fn test_to_sql_in_list() {
        let (sql, params) = age().in_([18, 21]).unwrap().to_sql().unwrap();
        assert_eq!(sql, "`age` IN (?, ?)");
        assert_eq!(params, vec![Value::Int(18), Value::Int(21)]);
    }

    #[test]
    fn test_to_sql_empty_in_matches_nothing() {
        let (sql, params) = age().in_(Vec::<i64>::new()).unwrap().to_sql().unwrap();
        assert_eq!(sql, "`age` IN (NULL)");
        assert!(params.is_empty());
    }

    #[test]
    fn test_to_sql_in_scalar() {
        let (sql, params) = Where::new("age", Operator::In, 5).to_sql().unwrap();
        assert_eq!(sql, "`age` IN (?)");
        assert_eq!(params, vec![Value::Int(5)]);
    }

    #[test]
    fn test_to_sql_exists_refused() {
        let err = age().exists([1, 2]).unwrap().to_sql().unwrap_err();
        assert_eq!(
            err,
            FieldError::Unrenderable {
                column: "age".to_string(),
                operator: "exists",
                reason: "EXISTS takes a subquery",
            }
        );
    }

    #[test]
    fn test_to_sql_list_with_scalar_operator_refused() {
        let err = age().eq(Value::list([1, 2])).unwrap().to_sql().unwrap_err();
        assert!(matches!(
            err,
            FieldError::Unrenderable { operator: "==", .. }
        ));
        assert!(age().ge(Value::list([1])).unwrap().to_sql().is_err());
    }

    #[test]
    fn test_to_sql_escapes_backticks() {
        let (sql, _) = Where::new("a`b", Operator::Gt, 1).to_sql().unwrap();
        assert_eq!(sql, "`a``b` > ?");
    }

    #[test]
    fn test_display() {
        assert_eq!(age().gt(30).unwrap().to_string(), "age > 30");
        assert_eq!(age().in_([1, 2]).unwrap().to_string(), "age in [1, 2]");
    }
}
