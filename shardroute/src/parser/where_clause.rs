//! `WHERE` clause predicates relevant to sharding.

use serde::{Deserialize, Serialize};

use super::Value;

/// Column, optionally qualified by a table name or alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    #[serde(default)]
    pub owner: Option<String>,
    pub name: String,
}

impl ColumnRef {
    pub fn new(name: impl ToString) -> Self {
        Self {
            owner: None,
            name: name.to_string(),
        }
    }

    pub fn qualified(owner: impl ToString, name: impl ToString) -> Self {
        Self {
            owner: Some(owner.to_string()),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// `column = value`
    Eq(Value),
    /// `column IN (values)`
    In(Vec<Value>),
    /// `column BETWEEN start AND end`
    Between(Value, Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: ColumnRef,
    pub operator: Operator,
}

impl Predicate {
    pub fn eq(column: ColumnRef, value: impl Into<Value>) -> Self {
        Self {
            column,
            operator: Operator::Eq(value.into()),
        }
    }

    pub fn in_list(column: ColumnRef, values: Vec<Value>) -> Self {
        Self {
            column,
            operator: Operator::In(values),
        }
    }

    pub fn between(column: ColumnRef, start: impl Into<Value>, end: impl Into<Value>) -> Self {
        Self {
            column,
            operator: Operator::Between(start.into(), end.into()),
        }
    }
}

/// Predicates in disjunctive normal form: branches are joined with `OR`,
/// predicates inside a branch with `AND`. Predicates the parser couldn't
/// express this way are left out.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WhereClause {
    pub branches: Vec<Vec<Predicate>>,
}

impl WhereClause {
    /// Single `AND` branch.
    pub fn and(predicates: Vec<Predicate>) -> Self {
        Self {
            branches: vec![predicates],
        }
    }

    /// Add an `OR` branch.
    pub fn or(mut self, predicates: Vec<Predicate>) -> Self {
        self.branches.push(predicates);
        self
    }
}
