//! Routing result: where a statement executes.

use std::hash::{Hash, Hasher};

use indexmap::IndexSet;
use serde::Serialize;

use crate::rule::DataNode;

/// Logical table and the actual table it maps to in one routing unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TableUnit {
    logical_table: String,
    actual_table: String,
}

impl TableUnit {
    pub fn new(logical_table: impl ToString, actual_table: impl ToString) -> Self {
        Self {
            logical_table: logical_table.to_string(),
            actual_table: actual_table.to_string(),
        }
    }

    pub fn logical_table(&self) -> &str {
        &self.logical_table
    }

    pub fn actual_table(&self) -> &str {
        &self.actual_table
    }
}

/// One data source and the actual tables a statement touches on it.
///
/// Two units are equal if they have the same data source and table units,
/// in any order.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingUnit {
    data_source: String,
    table_units: Vec<TableUnit>,
}

impl RoutingUnit {
    pub fn new(data_source: impl ToString) -> Self {
        Self {
            data_source: data_source.to_string(),
            table_units: vec![],
        }
    }

    /// Add a table unit. Ignored if the logical table already has one.
    pub fn with(mut self, table_unit: TableUnit) -> Self {
        self.add(table_unit);
        self
    }

    pub(crate) fn add(&mut self, table_unit: TableUnit) {
        if self.actual_table(&table_unit.logical_table).is_none() {
            self.table_units.push(table_unit);
        }
    }

    /// Unit with the table units of both. Both must be on the same data source.
    pub(crate) fn merge(mut self, other: &RoutingUnit) -> Self {
        debug_assert_eq!(self.data_source, other.data_source);
        for table_unit in &other.table_units {
            self.add(table_unit.clone());
        }
        self
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn table_units(&self) -> &[TableUnit] {
        &self.table_units
    }

    /// Actual table the logical table maps to in this unit.
    pub fn actual_table(&self, logical_table: &str) -> Option<&str> {
        self.table_units
            .iter()
            .find(|unit| unit.logical_table == logical_table)
            .map(|unit| unit.actual_table.as_str())
    }

    /// Data nodes touched by this unit.
    pub fn data_nodes(&self) -> Vec<DataNode> {
        self.table_units
            .iter()
            .map(|unit| DataNode::new(&self.data_source, &unit.actual_table))
            .collect()
    }

    fn sorted(&self) -> Vec<&TableUnit> {
        let mut units = self.table_units.iter().collect::<Vec<_>>();
        units.sort();
        units
    }
}

impl PartialEq for RoutingUnit {
    fn eq(&self, other: &Self) -> bool {
        self.data_source == other.data_source && self.sorted() == other.sorted()
    }
}

impl Eq for RoutingUnit {}

impl Hash for RoutingUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data_source.hash(state);
        self.sorted().hash(state);
    }
}

/// Deduplicated routing units, in the order they were produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoutingResult {
    units: IndexSet<RoutingUnit>,
}

impl RoutingResult {
    pub fn new(units: impl IntoIterator<Item = RoutingUnit>) -> Self {
        Self {
            units: units.into_iter().collect(),
        }
    }

    pub fn units(&self) -> impl Iterator<Item = &RoutingUnit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Statement runs in exactly one place.
    pub fn is_single(&self) -> bool {
        self.units.len() == 1
    }

    /// Distinct data sources, in unit order.
    pub fn data_source_names(&self) -> Vec<&str> {
        self.units
            .iter()
            .map(|unit| unit.data_source())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct data nodes across all units.
    pub fn data_nodes(&self) -> Vec<DataNode> {
        self.units
            .iter()
            .flat_map(|unit| unit.data_nodes())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Actual tables the logical table maps to on the data source.
    pub fn actual_tables(&self, data_source: &str, logical_table: &str) -> Vec<&str> {
        self.units
            .iter()
            .filter(|unit| unit.data_source() == data_source)
            .filter_map(|unit| unit.actual_table(logical_table))
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}
