//! Routing engine: logical tables and sharding conditions to the
//! data sources and actual tables a statement runs on.

pub mod broadcast;
pub mod complex;
pub mod error;
pub mod group;
pub mod result;
pub mod standard;

#[cfg(test)]
mod test;

pub use error::Error;
pub use group::RoutingGroup;
pub use result::{RoutingResult, RoutingUnit, TableUnit};
pub use standard::StandardRoutingEngine;

use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

use crate::condition::ConditionProvider;
use crate::rule::{LogicalTable, ShardingRule};

/// Route a statement over `tables`.
pub fn route(
    rule: &ShardingRule,
    tables: &[&str],
    conditions: &dyn ConditionProvider,
) -> Result<RoutingResult, Error> {
    RoutingEngine::new(rule, tables)?.route(rule, conditions)
}

/// How a statement is routed, decided by the tables it references.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingEngine<'a> {
    /// Only broadcast tables.
    Broadcast { tables: Vec<&'a str> },
    /// One routing group, plus broadcast tables.
    Standard {
        group: RoutingGroup<'a>,
        broadcast_tables: Vec<&'a str>,
    },
    /// Several routing groups joined on data source, plus broadcast tables.
    Complex {
        groups: Vec<RoutingGroup<'a>>,
        broadcast_tables: Vec<&'a str>,
    },
}

impl<'a> RoutingEngine<'a> {
    /// Pick the engine for the tables. Fails if any of them is unknown
    /// to the rule, or if there are none.
    pub fn new(rule: &'a ShardingRule, tables: &[&'a str]) -> Result<Self, Error> {
        let mut unknown = vec![];
        let mut groups: Vec<RoutingGroup<'a>> = vec![];
        let mut broadcast_tables = vec![];

        for table in tables.iter().copied().collect::<IndexSet<_>>() {
            match rule.resolve(table) {
                None => unknown.push(table.to_string()),

                Some(LogicalTable::Broadcast) => broadcast_tables.push(table),

                Some(LogicalTable::Default(data_source)) => {
                    groups.push(RoutingGroup::Default { table, data_source })
                }

                Some(LogicalTable::Sharded(table_rule)) => match rule.binding_group(table) {
                    Some(binding) => {
                        let existing = groups.iter_mut().find_map(|group| match group {
                            RoutingGroup::Binding(members)
                                if members
                                    .iter()
                                    .any(|member| binding.contains(member.logical_table())) =>
                            {
                                Some(members)
                            }
                            _ => None,
                        });

                        match existing {
                            Some(members) => members.push(table_rule),
                            None => groups.push(RoutingGroup::Binding(vec![table_rule])),
                        }
                    }
                    None => groups.push(RoutingGroup::Table(table_rule)),
                },
            }
        }

        if tables.is_empty() || !unknown.is_empty() {
            return Err(Error::TableNotFoundInRule(unknown));
        }

        let engine = match groups.len() {
            0 => Self::Broadcast {
                tables: broadcast_tables,
            },
            1 => Self::Standard {
                group: groups.remove(0),
                broadcast_tables,
            },
            _ => Self::Complex {
                groups,
                broadcast_tables,
            },
        };

        debug!("{} routing for [{}]", engine.kind(), engine.tables().join(", "));

        Ok(engine)
    }

    /// Route using the conditions.
    pub fn route(
        &self,
        rule: &ShardingRule,
        conditions: &dyn ConditionProvider,
    ) -> Result<RoutingResult, Error> {
        let units = match self {
            Self::Broadcast { tables } => broadcast::route(rule, tables),

            Self::Standard {
                group,
                broadcast_tables,
            } => broadcast::merge(group.route(rule, conditions)?, broadcast_tables),

            Self::Complex {
                groups,
                broadcast_tables,
            } => {
                let routed = groups
                    .iter()
                    .map(|group| group.route(rule, conditions))
                    .collect::<Result<Vec<_>, _>>()?;
                broadcast::merge(complex::combine(routed, &self.tables())?, broadcast_tables)
            }
        };

        Ok(RoutingResult::new(units))
    }

    /// Every logical table the engine routes.
    pub fn tables(&self) -> Vec<&'a str> {
        match self {
            Self::Broadcast { tables } => tables.clone(),
            Self::Standard {
                group,
                broadcast_tables,
            } => group
                .tables()
                .into_iter()
                .chain(broadcast_tables.iter().copied())
                .collect(),
            Self::Complex {
                groups,
                broadcast_tables,
            } => groups
                .iter()
                .flat_map(|group| group.tables())
                .chain(broadcast_tables.iter().copied())
                .collect(),
        }
    }

    pub fn kind(&self) -> EngineKind {
        match self {
            Self::Broadcast { .. } => EngineKind::Broadcast,
            Self::Standard { .. } => EngineKind::Standard,
            Self::Complex { .. } => EngineKind::Complex,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Broadcast,
    Standard,
    Complex,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Broadcast => write!(f, "broadcast"),
            Self::Standard => write!(f, "standard"),
            Self::Complex => write!(f, "complex"),
        }
    }
}
