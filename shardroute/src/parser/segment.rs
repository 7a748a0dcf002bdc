//! Pieces of the statement text, with their byte offsets.
//!
//! Offsets are half-open: `start` is the first byte of the segment,
//! `stop` is one past the last.

use serde::{Deserialize, Serialize};

use super::Value;

/// Anything that covers a range of the statement text.
pub trait Segment {
    fn start(&self) -> usize;

    fn stop(&self) -> usize;

    /// Text of the segment.
    fn text<'a>(&self, sql: &'a str) -> &'a str {
        sql.get(self.start()..self.stop()).unwrap_or_default()
    }
}

/// Table name in the statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSegment {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    pub start: usize,
    pub stop: usize,
}

impl TableSegment {
    pub fn new(name: impl ToString, start: usize, stop: usize) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
            start,
            stop,
        }
    }

    pub fn with_alias(mut self, alias: impl ToString) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// The table is referred to by this owner (name or alias).
    pub fn is_owner(&self, owner: &str) -> bool {
        self.alias.as_deref() == Some(owner) || self.name == owner
    }
}

impl Segment for TableSegment {
    fn start(&self) -> usize {
        self.start
    }

    fn stop(&self) -> usize {
        self.stop
    }
}

/// One value expression in a `VALUES` tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub start: usize,
    pub stop: usize,
    pub value: Value,
}

impl Expression {
    pub fn new(value: impl Into<Value>, start: usize, stop: usize) -> Self {
        Self {
            start,
            stop,
            value: value.into(),
        }
    }
}

impl Segment for Expression {
    fn start(&self) -> usize {
        self.start
    }

    fn stop(&self) -> usize {
        self.stop
    }
}

/// One parenthesized tuple of a multi-row `INSERT`, parentheses included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertValuesSegment {
    pub start: usize,
    pub stop: usize,
    pub values: Vec<Expression>,
}

impl InsertValuesSegment {
    pub fn new(start: usize, stop: usize, values: Vec<Expression>) -> Self {
        Self {
            start,
            stop,
            values,
        }
    }

    /// Parameter positions referenced by the tuple.
    pub fn placeholders(&self) -> impl Iterator<Item = usize> + '_ {
        self.values
            .iter()
            .filter_map(|expression| expression.value.placeholder())
    }
}

impl Segment for InsertValuesSegment {
    fn start(&self) -> usize {
        self.start
    }

    fn stop(&self) -> usize {
        self.stop
    }
}
