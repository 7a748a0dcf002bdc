//! Sharding rule: the immutable routing configuration snapshot.

pub mod binding;
pub mod data_node;
pub mod error;
pub mod table_rule;

pub use binding::BindingTableRule;
pub use data_node::DataNode;
pub use error::Error;
pub use table_rule::TableRule;

use fnv::FnvHashMap as HashMap;
use indexmap::IndexSet;
use shardroute_config::{Config, IncompleteConditions};
use tracing::debug;

use crate::sharding::ShardingStrategy;

/// How a logical table is routed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogicalTable<'a> {
    /// Spread over data nodes by its strategies.
    Sharded(&'a TableRule),
    /// Same table, same name, on every data source.
    Broadcast,
    /// Not configured; lives on the default data source.
    Default(&'a str),
}

/// Routing rules for every logical table.
#[derive(Debug, Clone, Default)]
pub struct ShardingRule {
    data_sources: Vec<String>,
    tables: HashMap<String, TableRule>,
    binding_groups: Vec<BindingTableRule>,
    broadcast_tables: IndexSet<String>,
    default_data_source: Option<String>,
    incomplete_conditions: IncompleteConditions,
}

impl ShardingRule {
    /// Build the rule from validated configuration.
    pub fn new(config: &Config) -> Result<Self, Error> {
        config.check()?;

        let mut rule = Self::default()
            .with_data_sources(config.data_source_names())
            .with_incomplete_conditions(config.general.incomplete_conditions);
        rule.default_data_source = config.general.default_data_source.clone();

        for table in &config.tables {
            let data_nodes: Vec<DataNode> = match table.actual_data_nodes {
                Some(ref nodes) => nodes
                    .expand()?
                    .into_iter()
                    .map(|(data_source, table)| DataNode::new(data_source, table))
                    .collect(),
                None => config
                    .data_sources
                    .iter()
                    .map(|ds| DataNode::new(&ds.name, &table.name))
                    .collect(),
            };

            let database_strategy = table
                .database_strategy
                .as_ref()
                .or(config.default_database_strategy.as_ref())
                .map(ShardingStrategy::from);
            let table_strategy = table
                .table_strategy
                .as_ref()
                .or(config.default_table_strategy.as_ref())
                .map(ShardingStrategy::from);

            debug!(
                "table \"{}\" has {} data nodes",
                table.name,
                data_nodes.len()
            );

            rule = rule.with_table(
                TableRule::new(&table.name, data_nodes)
                    .with_database_strategy(database_strategy)
                    .with_table_strategy(table_strategy),
            );
        }

        for group in &config.binding_tables {
            rule = rule.with_binding_tables(&group.tables);
        }

        for broadcast in &config.broadcast_tables {
            rule = rule.with_broadcast_table(&broadcast.name);
        }

        Ok(rule)
    }

    pub fn with_data_sources(mut self, data_sources: impl IntoIterator<Item = impl ToString>) -> Self {
        self.data_sources = data_sources.into_iter().map(|ds| ds.to_string()).collect();
        self
    }

    pub fn with_table(mut self, table: TableRule) -> Self {
        self.tables.insert(table.logical_table().to_string(), table);
        self
    }

    pub fn with_binding_tables(mut self, tables: impl IntoIterator<Item = impl ToString>) -> Self {
        self.binding_groups.push(BindingTableRule::new(tables));
        self
    }

    pub fn with_broadcast_table(mut self, table: impl ToString) -> Self {
        self.broadcast_tables.insert(table.to_string());
        self
    }

    pub fn with_default_data_source(mut self, data_source: impl ToString) -> Self {
        self.default_data_source = Some(data_source.to_string());
        self
    }

    pub fn with_incomplete_conditions(mut self, policy: IncompleteConditions) -> Self {
        self.incomplete_conditions = policy;
        self
    }

    /// Configured data sources, in configuration order.
    pub fn data_sources(&self) -> &[String] {
        &self.data_sources
    }

    pub fn default_data_source(&self) -> Option<&str> {
        self.default_data_source.as_deref()
    }

    /// Policy for sharded tables the statement doesn't carry values for.
    pub fn incomplete_conditions(&self) -> IncompleteConditions {
        self.incomplete_conditions
    }

    pub fn table_rule(&self, table: &str) -> Option<&TableRule> {
        self.tables.get(table)
    }

    pub fn is_broadcast(&self, table: &str) -> bool {
        self.broadcast_tables.contains(table)
    }

    pub fn broadcast_tables(&self) -> impl Iterator<Item = &str> {
        self.broadcast_tables.iter().map(|t| t.as_str())
    }

    /// Binding group the table belongs to, if any.
    pub fn binding_group(&self, table: &str) -> Option<&BindingTableRule> {
        self.binding_groups.iter().find(|group| group.contains(table))
    }

    /// How the table is routed. `None` if the rule doesn't know it.
    pub fn resolve(&self, table: &str) -> Option<LogicalTable<'_>> {
        if let Some(rule) = self.tables.get(table) {
            Some(LogicalTable::Sharded(rule))
        } else if self.is_broadcast(table) {
            Some(LogicalTable::Broadcast)
        } else {
            self.default_data_source().map(LogicalTable::Default)
        }
    }

    /// Sharding columns of the table; empty for tables that aren't sharded.
    pub fn sharding_columns(&self, table: &str) -> Vec<&str> {
        self.table_rule(table)
            .map(|rule| rule.sharding_columns())
            .unwrap_or_default()
    }

    /// Actual table of `table` that sits next to `other_actual_table` of
    /// `other_table`, a member of the same binding group, on `data_source`.
    pub fn binding_actual_table(
        &self,
        data_source: &str,
        table: &str,
        other_table: &str,
        other_actual_table: &str,
    ) -> Result<&str, Error> {
        let other = self
            .table_rule(other_table)
            .and_then(|rule| rule.actual_table_position(data_source, other_actual_table))
            .ok_or_else(|| Error::ActualTableNotFound {
                table: other_table.to_string(),
                data_source: data_source.to_string(),
                actual_table: other_actual_table.to_string(),
            })?;

        self.table_rule(table)
            .and_then(|rule| rule.actual_tables(data_source).get(other).copied())
            .ok_or_else(|| Error::BindingActualTableNotFound {
                table: table.to_string(),
                data_source: data_source.to_string(),
                position: other,
            })
    }
}
