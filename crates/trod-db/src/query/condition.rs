//! Composable conditions over [`Where`] predicates.
//!
//! [`Condition`] combines predicates with `&` (AND), `|` (OR) and `!` (NOT).
//!
//! # Examples
//!
//! ```
//! use trod_db::fields::Field;
//!
//! let name = Field::varchar(32).name("name");
//! let age = Field::tinyint(3).name("age");
//!
//! // name = "Alice" AND age > 25
//! let cond = name.eq("Alice").unwrap() & age.gt(25).unwrap();
//! let (sql, params) = cond.to_sql().unwrap();
//! assert_eq!(sql, "`name` = ? AND `age` > ?");
//! assert_eq!(params.len(), 2);
//! ```

use std::ops;

use crate::fields::FieldResult;
use crate::query::predicate::Where;
use crate::value::Value;

/// A composable filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A single predicate.
    Where(Where),
    /// Logical AND of multiple conditions.
    And(Vec<Condition>),
    /// Logical OR of multiple conditions.
    Or(Vec<Condition>),
    /// Logical negation of a condition.
    Not(Box<Condition>),
}

impl Condition {
    /// Returns `true` if this is an empty AND or OR.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::And(children) | Self::Or(children) => children.is_empty(),
            _ => false,
        }
    }

    /// Renders the condition with `?` placeholders.
    ///
    /// Composite children are parenthesised. An empty AND renders as `1 = 1`
    /// and an empty OR as `1 = 0`. Fails on the first predicate that
    /// [`Where::to_sql`] would refuse.
    pub fn to_sql(&self) -> FieldResult<(String, Vec<Value>)> {
        let mut sql = String::new();
        let mut params = Vec::new();
        self.compile(&mut sql, &mut params)?;
        Ok((sql, params))
    }

    fn compile(&self, sql: &mut String, params: &mut Vec<Value>) -> FieldResult<()> {
        match self {
            Self::Where(predicate) => predicate.compile(sql, params)?,
            Self::And(children) if children.is_empty() => sql.push_str("1 = 1"),
            Self::Or(children) if children.is_empty() => sql.push_str("1 = 0"),
            Self::And(children) => Self::compile_joined(children, " AND ", sql, params)?,
            Self::Or(children) => Self::compile_joined(children, " OR ", sql, params)?,
            Self::Not(inner) => {
                sql.push_str("NOT ");
                inner.compile_child(sql, params)?;
            }
        }
        Ok(())
    }

    fn compile_joined(
        children: &[Self],
        sep: &str,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) -> FieldResult<()> {
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                sql.push_str(sep);
            }
            child.compile_child(sql, params)?;
        }
        Ok(())
    }

    fn compile_child(&self, sql: &mut String, params: &mut Vec<Value>) -> FieldResult<()> {
        if let Self::Where(predicate) = self {
            predicate.compile(sql, params)
        } else {
            sql.push('(');
            self.compile(sql, params)?;
            sql.push(')');
            Ok(())
        }
    }
}

impl From<Where> for Condition {
    fn from(predicate: Where) -> Self {
        Self::Where(predicate)
    }
}

impl<R: Into<Condition>> ops::BitAnd<R> for Condition {
    type Output = Self;

    fn bitand(self, rhs: R) -> Self::Output {
        match (self, rhs.into()) {
            // Flatten nested ANDs
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), other) => {
                left.push(other);
                Self::And(left)
            }
            (other, Self::And(mut right)) => {
                right.insert(0, other);
                Self::And(right)
            }
            (left, right) => Self::And(vec![left, right]),
        }
    }
}

impl<R: Into<Condition>> ops::BitOr<R> for Condition {
    type Output = Self;

    fn bitor(self, rhs: R) -> Self::Output {
        match (self, rhs.into()) {
            // Flatten nested ORs
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), other) => {
                left.push(other);
                Self::Or(left)
            }
            (other, Self::Or(mut right)) => {
                right.insert(0, other);
                Self::Or(right)
            }
            (left, right) => Self::Or(vec![left, right]),
        }
    }
}

impl ops::Not for Condition {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }
}

impl<R: Into<Condition>> ops::BitAnd<R> for Where {
    type Output = Condition;

    fn bitand(self, rhs: R) -> Self::Output {
        Condition::from(self) & rhs
    }
}

impl<R: Into<Condition>> ops::BitOr<R> for Where {
    type Output = Condition;

    fn bitor(self, rhs: R) -> Self::Output {
        Condition::from(self) | rhs
    }
}

impl ops::Not for Where {
    type Output = Condition;

    fn not(self) -> Self::Output {
        !Condition::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::predicate::Operator;

    fn w(column: &str, value: i64) -> Where {
        Where::new(column, Operator::Eq, value)
    }

    #[test]
    fn test_and_operator() {
        match w("a", 1) & w("b", 2) {
            Condition::And(children) => assert_eq!(children.len(), 2),
            other => panic!("Expected And, got {other:?}"),
        }
    }

    #[test]
    fn test_or_operator() {
        match w("a", 1) | w("a", 2) {
            Condition::Or(children) => assert_eq!(children.len(), 2),
            other => panic!("Expected Or, got {other:?}"),
        }
    }

    #[test]
    fn test_double_negation() {
        let c = Condition::from(w("a", 1));
        assert_eq!(!!c.clone(), c);
    }

    #[test]
    fn test_and_flattening() {
        match (w("a", 1) & w("b", 2)) & w("c", 3) {
            Condition::And(children) => assert_eq!(children.len(), 3),
            other => panic!("Expected And with 3 children, got {other:?}"),
        }
    }

    #[test]
    fn test_or_flattening_right() {
        let right = w("b", 2) | w("c", 3);
        match Condition::from(w("a", 1)) | right {
            Condition::Or(children) => {
                assert_eq!(children.len(), 3);
                assert_eq!(children[0], Condition::Where(w("a", 1)));
            }
            other => panic!("Expected Or, got {other:?}"),
        }
    }

    #[test]
    fn test_is_empty() {
        assert!(Condition::And(vec![]).is_empty());
        assert!(Condition::Or(vec![]).is_empty());
        assert!(!Condition::from(w("x", 1)).is_empty());
    }

    #[test]
    fn test_to_sql_nested() {
        // (a = 1 AND b = 2) OR NOT c = 3
        let cond = (w("a", 1) & w("b", 2)) | !w("c", 3);
        let (sql, params) = cond.to_sql().unwrap();
        assert_eq!(sql, "(`a` = ? AND `b` = ?) OR (NOT `c` = ?)");
        assert_eq!(params, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_to_sql_not_composite() {
        let (sql, _) = (!(w("a", 1) | w("b", 2))).to_sql().unwrap();
        assert_eq!(sql, "NOT (`a` = ? OR `b` = ?)");
    }

    #[test]
    fn test_to_sql_empty() {
        assert_eq!(Condition::And(vec![]).to_sql().unwrap().0, "1 = 1");
        assert_eq!(Condition::Or(vec![]).to_sql().unwrap().0, "1 = 0");
    }

    #[test]
    fn test_to_sql_propagates_unrenderable_child() {
        let cond = w("a", 1) & Where::new("b", Operator::Exists, Value::list([1, 2]));
        assert!(matches!(
            cond.to_sql(),
            Err(crate::fields::FieldError::Unrenderable { operator: "exists", .. })
        ));
    }
}
