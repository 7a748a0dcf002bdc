//! Sharding conditions from `WHERE` predicates.

use shardroute_config::FlexibleType;
use tracing::{debug, trace};

use super::{Error, ShardingCondition, ShardingConditions};
use crate::parser::{ColumnRef, Operator, Statement, StatementKind, Value};
use crate::rule::ShardingRule;
use crate::sharding::ShardingValue;

/// Pulls sharding column values out of a statement, resolving
/// placeholders against the bound parameters.
#[derive(Debug)]
pub struct ConditionExtractor<'a> {
    pub(super) rule: &'a ShardingRule,
    pub(super) statement: &'a Statement,
    pub(super) parameters: &'a [Value],
}

impl<'a> ConditionExtractor<'a> {
    pub fn new(rule: &'a ShardingRule, statement: &'a Statement, parameters: &'a [Value]) -> Self {
        Self {
            rule,
            statement,
            parameters,
        }
    }

    /// Conditions for every sharded table the statement references.
    pub fn extract(&self) -> Result<ShardingConditions, Error> {
        let conditions = match self.statement.kind() {
            StatementKind::Insert(insert) => self.insert(insert)?,
            _ => self.where_clause()?,
        };

        debug!(
            "sharding conditions found for [{}]",
            conditions.tables().collect::<Vec<_>>().join(", ")
        );

        Ok(conditions)
    }

    fn where_clause(&self) -> Result<ShardingConditions, Error> {
        let mut result = ShardingConditions::new();

        let Some(where_clause) = self.statement.where_clause() else {
            return Ok(result);
        };

        for table in self.statement.logical_tables() {
            let columns = self.rule.sharding_columns(table);
            if columns.is_empty() {
                continue;
            }

            let mut conditions = vec![];

            for branch in &where_clause.branches {
                let mut condition = ShardingCondition::new();

                for predicate in branch {
                    if !columns.contains(&predicate.column.name.as_str())
                        || !self.refers_to(&predicate.column, table)
                    {
                        continue;
                    }

                    if let Some(value) = self.sharding_value(&predicate.operator)? {
                        trace!("{}.{} = {:?}", table, predicate.column.name, value);
                        condition = condition.with(&predicate.column.name, value);
                    }
                }

                // A branch without values for this table matches rows on
                // any of its nodes, so the whole OR does.
                if condition.is_empty() {
                    conditions.clear();
                    break;
                }

                conditions.push(condition);
            }

            if !conditions.is_empty() {
                result.insert(table, conditions);
            }
        }

        Ok(result)
    }

    /// Unqualified columns refer to every table sharded on them.
    fn refers_to(&self, column: &ColumnRef, table: &str) -> bool {
        match column.owner {
            Some(ref owner) => self.statement.owner_table(owner) == Some(table),
            None => true,
        }
    }

    fn sharding_value(&self, operator: &Operator) -> Result<Option<ShardingValue>, Error> {
        Ok(match operator {
            Operator::Eq(value) => self.resolve(value)?.map(ShardingValue::single),

            Operator::In(values) => {
                let mut keys = vec![];
                for value in values {
                    match self.resolve(value)? {
                        Some(key) => keys.push(key),
                        // NULL never matches, other values could match anything.
                        None if self.is_null(value) => (),
                        None => {
                            trace!("IN value {:?} can't be sharded on, ignoring the list", value);
                            return Ok(None);
                        }
                    }
                }
                Some(ShardingValue::List(keys))
            }

            Operator::Between(start, end) => match (self.resolve(start)?, self.resolve(end)?) {
                (Some(start), Some(end)) => Some(ShardingValue::range(start, end)),
                _ => None,
            },
        })
    }

    fn is_null(&self, value: &Value) -> bool {
        match value.placeholder() {
            Some(position) => matches!(self.parameters.get(position), Some(Value::Null)),
            None => matches!(value, Value::Null),
        }
    }

    /// Sharding key of a literal or bound parameter.
    pub(super) fn resolve(&self, value: &Value) -> Result<Option<FlexibleType>, Error> {
        match value.placeholder() {
            Some(position) => self
                .parameters
                .get(position)
                .map(|parameter| parameter.sharding_key())
                .ok_or(Error::MissingParameter(position)),
            None => Ok(value.sharding_key()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::condition::ConditionProvider;
    use crate::parser::{Predicate, WhereClause};
    use crate::test::{rule, select};

    #[test]
    fn test_equality_and_in() {
        let rule = rule();
        let statement = select(
            "SELECT * FROM t_order WHERE user_id = 1 AND order_id IN (1, 2)",
            &["t_order"],
            Some(WhereClause::and(vec![
                Predicate::eq(ColumnRef::new("user_id"), 1i64),
                Predicate::in_list(
                    ColumnRef::new("order_id"),
                    vec![Value::Integer(1), Value::Integer(2)],
                ),
            ])),
        );

        let conditions = ConditionExtractor::new(&rule, &statement, &[])
            .extract()
            .unwrap();
        let order = conditions.conditions("t_order");
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].get("user_id"), Some(&ShardingValue::single(1i64)));
        assert_eq!(
            order[0].get("order_id"),
            Some(&ShardingValue::List(vec![1i64.into(), 2i64.into()]))
        );
    }

    #[test]
    fn test_placeholders() {
        let rule = rule();
        let statement = select(
            "SELECT * FROM t_order WHERE order_id BETWEEN ? AND ?",
            &["t_order"],
            Some(WhereClause::and(vec![Predicate::between(
                ColumnRef::new("order_id"),
                Value::Placeholder(0),
                Value::Placeholder(1),
            )])),
        );

        let parameters = [Value::Integer(5), Value::String("10".into())];
        let conditions = ConditionExtractor::new(&rule, &statement, &parameters)
            .extract()
            .unwrap();
        assert_eq!(
            conditions.conditions("t_order")[0].get("order_id"),
            Some(&ShardingValue::range(5i64, 10i64))
        );

        let error = ConditionExtractor::new(&rule, &statement, &parameters[..1])
            .extract()
            .unwrap_err();
        assert!(matches!(error, Error::MissingParameter(1)));
    }

    #[test]
    fn test_owner_resolution() {
        let rule = rule();
        let statement = select(
            "SELECT * FROM t_order o JOIN t_user u ON o.user_id = u.user_id WHERE o.user_id = 1 AND u.user_id = 2",
            &["t_order o", "t_user u"],
            Some(WhereClause::and(vec![
                Predicate::eq(ColumnRef::qualified("o", "user_id"), 1i64),
                Predicate::eq(ColumnRef::qualified("u", "user_id"), 2i64),
            ])),
        );

        let conditions = ConditionExtractor::new(&rule, &statement, &[])
            .extract()
            .unwrap();
        assert_eq!(
            conditions.conditions("t_order")[0].get("user_id"),
            Some(&ShardingValue::single(1i64))
        );
        assert_eq!(
            conditions.conditions("t_user")[0].get("user_id"),
            Some(&ShardingValue::single(2i64))
        );
    }

    #[test]
    fn test_or_branches() {
        let rule = rule();
        let where_clause = WhereClause::and(vec![Predicate::eq(ColumnRef::new("order_id"), 1i64)])
            .or(vec![Predicate::eq(ColumnRef::new("order_id"), 2i64)]);
        let statement = select(
            "SELECT * FROM t_order WHERE order_id = 1 OR order_id = 2",
            &["t_order"],
            Some(where_clause),
        );
        let conditions = ConditionExtractor::new(&rule, &statement, &[])
            .extract()
            .unwrap();
        assert_eq!(conditions.conditions("t_order").len(), 2);

        // One branch without a sharding value: nothing to narrow on.
        let where_clause = WhereClause::and(vec![Predicate::eq(ColumnRef::new("order_id"), 1i64)])
            .or(vec![Predicate::eq(ColumnRef::new("status"), "paid")]);
        let statement = select(
            "SELECT * FROM t_order WHERE order_id = 1 OR status = 'paid'",
            &["t_order"],
            Some(where_clause),
        );
        let conditions = ConditionExtractor::new(&rule, &statement, &[])
            .extract()
            .unwrap();
        assert!(conditions.conditions("t_order").is_empty());
    }

    #[test]
    fn test_in_with_null() {
        let rule = rule();
        let statement = select(
            "SELECT * FROM t_order WHERE order_id IN (3, NULL)",
            &["t_order"],
            Some(WhereClause::and(vec![Predicate::in_list(
                ColumnRef::new("order_id"),
                vec![Value::Integer(3), Value::Null],
            )])),
        );
        let conditions = ConditionExtractor::new(&rule, &statement, &[])
            .extract()
            .unwrap();
        assert_eq!(
            conditions.conditions("t_order")[0].get("order_id"),
            Some(&ShardingValue::single(3i64))
        );
    }

    #[test]
    fn test_in_with_unusable_value() {
        let rule = rule();
        let statement = select(
            "SELECT * FROM t_order WHERE user_id = 1 AND order_id IN (1, 2.5)",
            &["t_order"],
            Some(WhereClause::and(vec![
                Predicate::eq(ColumnRef::new("user_id"), 1i64),
                Predicate::in_list(
                    ColumnRef::new("order_id"),
                    vec![Value::Integer(1), Value::Float(2.5)],
                ),
            ])),
        );
        let conditions = ConditionExtractor::new(&rule, &statement, &[])
            .extract()
            .unwrap();
        let order = conditions.conditions("t_order");
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].get("user_id"), Some(&ShardingValue::single(1i64)));
        assert_eq!(order[0].get("order_id"), None);
    }
}
