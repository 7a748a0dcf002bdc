//! Sharding conditions: the sharding column values a statement carries.

pub mod error;
pub mod extract;
pub mod insert;

pub use error::Error;
pub use extract::ConditionExtractor;

use indexmap::IndexMap;
use serde::Serialize;

use crate::sharding::ShardingValue;

/// Value of one sharding column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnValue {
    column: String,
    value: ShardingValue,
}

impl ColumnValue {
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn value(&self) -> &ShardingValue {
        &self.value
    }
}

/// Sharding column values for one routing decision: one `AND` branch
/// of a `WHERE` clause, or one `INSERT` row.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ShardingCondition {
    values: Vec<ColumnValue>,
}

impl ShardingCondition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column value. A second value for the same column narrows
    /// the first, like two predicates joined with `AND`.
    pub fn with(mut self, column: impl ToString, value: ShardingValue) -> Self {
        let column = column.to_string();
        if let Some(existing) = self.values.iter_mut().find(|v| v.column == column) {
            existing.value = existing.value.intersect(&value);
        } else {
            self.values.push(ColumnValue { column, value });
        }
        self
    }

    /// Column values, in the order they were found.
    pub fn values(&self) -> &[ColumnValue] {
        &self.values
    }

    /// Value of the column, if the condition has one.
    pub fn get(&self, column: &str) -> Option<&ShardingValue> {
        self.values
            .iter()
            .find(|v| v.column == column)
            .map(|v| &v.value)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// No row can satisfy the condition, e.g. `id = 1 AND id = 2`.
    pub fn is_unsatisfiable(&self) -> bool {
        self.values.iter().any(|v| v.value.is_empty())
    }
}

/// Supplies sharding conditions per logical table.
pub trait ConditionProvider {
    /// Conditions for the table, joined with `OR`. Empty if the
    /// statement carries no sharding values for it.
    fn conditions(&self, table: &str) -> &[ShardingCondition];
}

/// Conditions keyed by logical table.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ShardingConditions {
    tables: IndexMap<String, Vec<ShardingCondition>>,
}

impl ShardingConditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, table: impl ToString, conditions: Vec<ShardingCondition>) -> Self {
        self.insert(table, conditions);
        self
    }

    pub fn insert(&mut self, table: impl ToString, conditions: Vec<ShardingCondition>) {
        self.tables.insert(table.to_string(), conditions);
    }

    /// Tables with conditions.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|t| t.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(|c| c.is_empty())
    }
}

impl ConditionProvider for ShardingConditions {
    fn conditions(&self, table: &str) -> &[ShardingCondition] {
        self.tables
            .get(table)
            .map(|c| c.as_slice())
            .unwrap_or_default()
    }
}
