//! Data nodes of one sharded table.

use indexmap::IndexSet;
use shardroute_config::IncompleteConditions;
use tracing::{debug, trace};

use super::Error;
use crate::condition::ShardingCondition;
use crate::rule::{DataNode, ShardingRule, TableRule};
use crate::sharding::ShardingStrategy;

/// Resolves the data nodes of a single table from its sharding conditions.
#[derive(Debug, Clone, Copy)]
pub struct StandardRoutingEngine<'a> {
    rule: &'a ShardingRule,
    table_rule: &'a TableRule,
}

impl<'a> StandardRoutingEngine<'a> {
    pub fn new(rule: &'a ShardingRule, table_rule: &'a TableRule) -> Self {
        Self { rule, table_rule }
    }

    /// Data nodes matching any of the conditions, in configuration order.
    ///
    /// Without conditions, every node matches, subject to the incomplete
    /// conditions policy. If no condition can be satisfied, the first
    /// data node is returned so the statement still runs and finds nothing.
    /// A value whose shard has no data node is an error.
    pub fn data_nodes(&self, conditions: &[ShardingCondition]) -> Result<Vec<DataNode>, Error> {
        let empty = [ShardingCondition::new()];
        let conditions = if conditions.is_empty() {
            &empty[..]
        } else {
            conditions
        };

        let mut matched = IndexSet::new();
        for condition in conditions {
            if condition.is_unsatisfiable() {
                trace!("skipping unsatisfiable condition {:?}", condition);
                continue;
            }
            matched.extend(self.route(condition)?);
        }

        let nodes = self
            .table_rule
            .data_nodes()
            .iter()
            .filter(|node| matched.contains(*node))
            .cloned()
            .collect::<Vec<_>>();

        // Only unsatisfiable conditions leave nothing matched.
        if nodes.is_empty() {
            debug!(
                "no data node of \"{}\" can match, using the first one",
                self.table_rule.logical_table()
            );
            return Ok(self
                .table_rule
                .data_nodes()
                .first()
                .cloned()
                .into_iter()
                .collect());
        }

        debug!(
            "\"{}\" routed to [{}]",
            self.table_rule.logical_table(),
            nodes
                .iter()
                .map(|node| node.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(nodes)
    }

    /// Database strategy picks data sources, then table strategy picks
    /// actual tables on each of them.
    fn route(&self, condition: &ShardingCondition) -> Result<Vec<DataNode>, Error> {
        let data_sources = self.table_rule.data_source_names();
        let data_sources =
            self.apply(self.table_rule.database_strategy(), &data_sources, condition)?;

        let mut nodes = vec![];
        for data_source in data_sources {
            let tables = self.table_rule.actual_tables(data_source);
            let tables = self.apply(self.table_rule.table_strategy(), &tables, condition)?;
            nodes.extend(
                tables
                    .into_iter()
                    .map(|table| DataNode::new(data_source, table)),
            );
        }

        Ok(nodes)
    }

    fn apply<'t>(
        &self,
        strategy: Option<&ShardingStrategy>,
        targets: &[&'t str],
        condition: &ShardingCondition,
    ) -> Result<Vec<&'t str>, Error> {
        let Some(strategy) = strategy else {
            return Ok(targets.to_vec());
        };

        match condition.get(strategy.column()) {
            Some(value) => {
                let selected = strategy.route(targets, value);
                if selected.is_empty() && !targets.is_empty() {
                    return Err(Error::NoDataNode {
                        table: self.table_rule.logical_table().to_string(),
                        column: strategy.column().to_string(),
                    });
                }
                Ok(selected)
            }
            None => match self.rule.incomplete_conditions() {
                IncompleteConditions::FanOut => {
                    trace!(
                        "no value for \"{}.{}\", fanning out",
                        self.table_rule.logical_table(),
                        strategy.column()
                    );
                    Ok(targets.to_vec())
                }
                IncompleteConditions::Error => Err(Error::IncompleteShardingCondition {
                    table: self.table_rule.logical_table().to_string(),
                    column: strategy.column().to_string(),
                }),
            },
        }
    }
}
