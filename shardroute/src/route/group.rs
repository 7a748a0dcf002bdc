//! Tables that are routed together.

use tracing::debug;

use super::{Error, RoutingUnit, StandardRoutingEngine, TableUnit};
use crate::condition::ConditionProvider;
use crate::rule::{ShardingRule, TableRule};

/// Tables whose placement is decided by one routing decision.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingGroup<'a> {
    /// Members of one binding group referenced by the statement, in
    /// statement order.
    Binding(Vec<&'a TableRule>),
    /// Sharded table outside any binding group.
    Table(&'a TableRule),
    /// Table without a rule, on the default data source.
    Default { table: &'a str, data_source: &'a str },
}

impl<'a> RoutingGroup<'a> {
    /// Logical tables in the group.
    pub fn tables(&self) -> Vec<&'a str> {
        match self {
            Self::Binding(members) => members.iter().map(|m| m.logical_table()).collect(),
            Self::Table(table) => vec![table.logical_table()],
            Self::Default { table, .. } => vec![*table],
        }
    }

    /// Routing units of the group, one per data node of its leading table.
    pub fn route(
        &self,
        rule: &ShardingRule,
        conditions: &dyn ConditionProvider,
    ) -> Result<Vec<RoutingUnit>, Error> {
        match self {
            Self::Default { table, data_source } => Ok(vec![
                RoutingUnit::new(data_source).with(TableUnit::new(table, table)),
            ]),

            Self::Table(table) => {
                let nodes = StandardRoutingEngine::new(rule, table)
                    .data_nodes(conditions.conditions(table.logical_table()))?;

                Ok(nodes
                    .into_iter()
                    .map(|node| {
                        RoutingUnit::new(node.data_source())
                            .with(TableUnit::new(table.logical_table(), node.table()))
                    })
                    .collect())
            }

            Self::Binding(members) => {
                let Some(representative) = members
                    .iter()
                    .find(|m| !conditions.conditions(m.logical_table()).is_empty())
                    .or(members.first())
                else {
                    return Ok(vec![]);
                };
                let logical_table = representative.logical_table();

                debug!(
                    "routing binding tables [{}] by \"{}\"",
                    self.tables().join(", "),
                    logical_table
                );

                let nodes = StandardRoutingEngine::new(rule, representative)
                    .data_nodes(conditions.conditions(logical_table))?;

                let mut units = Vec::with_capacity(nodes.len());
                for node in nodes {
                    let mut unit = RoutingUnit::new(node.data_source())
                        .with(TableUnit::new(logical_table, node.table()));

                    for member in members {
                        if member.logical_table() == logical_table {
                            continue;
                        }
                        let actual_table = rule.binding_actual_table(
                            node.data_source(),
                            member.logical_table(),
                            logical_table,
                            node.table(),
                        )?;
                        unit.add(TableUnit::new(member.logical_table(), actual_table));
                    }

                    units.push(unit);
                }

                Ok(units)
            }
        }
    }
}
