//! Text edits applied to a statement for each routing unit.

use serde::Serialize;

use crate::parser::{InsertValuesSegment, Segment};
use crate::route::RoutingUnit;
use crate::rule::DataNode;

/// Source text at `[start, stop)` is replaced when rewriting.
pub trait Substitutable {
    fn start(&self) -> usize;
    fn stop(&self) -> usize;
}

/// Logical table name, replaced with the unit's actual table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableToken {
    start: usize,
    stop: usize,
    logical_table: String,
}

impl TableToken {
    pub fn new(start: usize, stop: usize, logical_table: impl ToString) -> Self {
        Self {
            start,
            stop,
            logical_table: logical_table.to_string(),
        }
    }

    pub fn logical_table(&self) -> &str {
        &self.logical_table
    }

    /// Table name to use in the unit. Units that don't route the table
    /// keep the logical name.
    pub fn to_sql<'a>(&'a self, unit: &'a RoutingUnit) -> &'a str {
        unit.actual_table(&self.logical_table)
            .unwrap_or(self.logical_table.as_str())
    }
}

impl Substitutable for TableToken {
    fn start(&self) -> usize {
        self.start
    }

    fn stop(&self) -> usize {
        self.stop
    }
}

/// One `VALUES` tuple and the data nodes it belongs on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertValueToken {
    tuple: InsertValuesSegment,
    data_nodes: Vec<DataNode>,
}

impl InsertValueToken {
    pub fn new(tuple: InsertValuesSegment, data_nodes: Vec<DataNode>) -> Self {
        Self { tuple, data_nodes }
    }

    pub fn tuple(&self) -> &InsertValuesSegment {
        &self.tuple
    }

    /// Data nodes the tuple is written to. Empty means all of them.
    pub fn data_nodes(&self) -> &[DataNode] {
        &self.data_nodes
    }

    /// The tuple belongs on at least one of the nodes.
    pub fn is_applicable(&self, nodes: &[DataNode]) -> bool {
        self.data_nodes.is_empty() || nodes.iter().any(|node| self.data_nodes.contains(node))
    }

    /// Tuple text, parentheses included.
    pub fn to_sql<'a>(&self, sql: &'a str) -> &'a str {
        self.tuple.text(sql)
    }
}

/// Every tuple of a multi-row `INSERT`, from the first `(` to the
/// last `)`. Each unit gets only the tuples that belong on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertValuesToken {
    start: usize,
    stop: usize,
    values: Vec<InsertValueToken>,
}

impl InsertValuesToken {
    pub fn new(start: usize, stop: usize, values: Vec<InsertValueToken>) -> Self {
        Self {
            start,
            stop,
            values,
        }
    }

    pub fn values(&self) -> &[InsertValueToken] {
        &self.values
    }

    /// Tuples written to a unit touching `nodes`.
    pub fn applicable<'a>(
        &'a self,
        nodes: &'a [DataNode],
    ) -> impl Iterator<Item = &'a InsertValueToken> + 'a {
        self.values.iter().filter(move |value| value.is_applicable(nodes))
    }

    /// Tuples for the unit, joined with `, `. `None` if there are none.
    pub fn to_sql(&self, sql: &str, nodes: &[DataNode]) -> Option<String> {
        let values = self
            .applicable(nodes)
            .map(|value| value.to_sql(sql))
            .collect::<Vec<_>>();

        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    /// Parameters referenced by tuples that don't go to the unit.
    pub fn excluded_parameters(&self, nodes: &[DataNode]) -> Vec<usize> {
        self.values
            .iter()
            .filter(|value| !value.is_applicable(nodes))
            .flat_map(|value| value.tuple.placeholders())
            .collect()
    }
}

impl Substitutable for InsertValuesToken {
    fn start(&self) -> usize {
        self.start
    }

    fn stop(&self) -> usize {
        self.stop
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SqlToken {
    Table(TableToken),
    InsertValues(InsertValuesToken),
}

impl Substitutable for SqlToken {
    fn start(&self) -> usize {
        match self {
            Self::Table(token) => token.start(),
            Self::InsertValues(token) => token.start(),
        }
    }

    fn stop(&self) -> usize {
        match self {
            Self::Table(token) => token.stop(),
            Self::InsertValues(token) => token.stop(),
        }
    }
}

impl From<TableToken> for SqlToken {
    fn from(token: TableToken) -> Self {
        Self::Table(token)
    }
}

impl From<InsertValuesToken> for SqlToken {
    fn from(token: InsertValuesToken) -> Self {
        Self::InsertValues(token)
    }
}
