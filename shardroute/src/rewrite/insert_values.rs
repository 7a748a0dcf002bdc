//! Token for the `VALUES` tuples of a multi-row `INSERT`.

use std::slice;

use tracing::debug;

use super::{Error, InsertValueToken, InsertValuesToken};
use crate::condition::ShardingCondition;
use crate::parser::{Segment, Statement, StatementKind};
use crate::route::StandardRoutingEngine;
use crate::rule::ShardingRule;

/// Pairs each tuple with the data nodes its sharding condition selects.
#[derive(Debug, Clone, Copy)]
pub struct InsertValuesTokenGenerator<'a> {
    rule: &'a ShardingRule,
}

impl<'a> InsertValuesTokenGenerator<'a> {
    pub fn new(rule: &'a ShardingRule) -> Self {
        Self { rule }
    }

    /// Token spanning every tuple, or `None` if the statement isn't an
    /// `INSERT` with values.
    ///
    /// The Nth tuple pairs with the Nth condition. Without conditions the
    /// table isn't sharding-aware and every tuple goes everywhere.
    pub fn generate(
        &self,
        statement: &Statement,
        conditions: Option<&[ShardingCondition]>,
    ) -> Result<Option<InsertValuesToken>, Error> {
        let StatementKind::Insert(ref insert) = statement.kind else {
            return Ok(None);
        };

        let tuples = &insert.values;
        let (Some(start), Some(stop)) = (
            tuples.iter().map(|tuple| tuple.start()).min(),
            tuples.iter().map(|tuple| tuple.stop()).max(),
        ) else {
            return Ok(None);
        };

        if let Some(conditions) = conditions {
            if conditions.len() != tuples.len() {
                return Err(Error::ConditionCountMismatch {
                    tuples: tuples.len(),
                    conditions: conditions.len(),
                });
            }
        }

        let table_rule = self.rule.table_rule(&insert.table);
        let mut values = Vec::with_capacity(tuples.len());

        for (position, tuple) in tuples.iter().enumerate() {
            let data_nodes = match (table_rule, conditions) {
                (Some(table_rule), Some(conditions)) => {
                    StandardRoutingEngine::new(self.rule, table_rule)
                        .data_nodes(slice::from_ref(&conditions[position]))?
                }
                _ => vec![],
            };

            values.push(InsertValueToken::new(tuple.clone(), data_nodes));
        }

        debug!(
            "{} value tuples of \"{}\" at [{}, {})",
            values.len(),
            insert.table,
            start,
            stop
        );

        Ok(Some(InsertValuesToken::new(start, stop, values)))
    }
}
