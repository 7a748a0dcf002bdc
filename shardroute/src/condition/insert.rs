//! Sharding conditions from `INSERT` rows.

use super::{ConditionExtractor, Error, ShardingCondition, ShardingConditions};
use crate::parser::Insert;
use crate::sharding::ShardingValue;

impl ConditionExtractor<'_> {
    /// One condition per `VALUES` tuple, in tuple order. Sharding columns
    /// are matched to tuple values by their position in the column list.
    pub(super) fn insert(&self, insert: &Insert) -> Result<ShardingConditions, Error> {
        let mut result = ShardingConditions::new();

        if self.rule.table_rule(&insert.table).is_none() {
            return Ok(result);
        }

        let columns = self
            .rule
            .sharding_columns(&insert.table)
            .into_iter()
            .filter_map(|column| {
                insert
                    .columns
                    .iter()
                    .position(|c| c == column)
                    .map(|position| (column, position))
            })
            .collect::<Vec<_>>();

        let mut conditions = Vec::with_capacity(insert.values.len());

        for tuple in &insert.values {
            let mut condition = ShardingCondition::new();

            for (column, position) in &columns {
                let Some(expression) = tuple.values.get(*position) else {
                    continue;
                };

                if let Some(key) = self.resolve(&expression.value)? {
                    condition = condition.with(column, ShardingValue::single(key));
                }
            }

            conditions.push(condition);
        }

        result.insert(&insert.table, conditions);

        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use crate::condition::{ConditionExtractor, ConditionProvider, Error};
    use crate::parser::Value;
    use crate::sharding::ShardingValue;
    use crate::test::{insert, rule};

    #[test]
    fn test_condition_per_tuple() {
        let rule = rule();
        let statement = insert(
            "INSERT INTO t_order (user_id, order_id, status) VALUES (1, 10, 'new'), (?, ?, 'paid')",
        );

        let parameters = [Value::Integer(2), Value::Integer(11)];
        let conditions = ConditionExtractor::new(&rule, &statement, &parameters)
            .extract()
            .unwrap();
        let order = conditions.conditions("t_order");

        assert_eq!(order.len(), 2);
        assert_eq!(order[0].get("user_id"), Some(&ShardingValue::single(1i64)));
        assert_eq!(order[0].get("order_id"), Some(&ShardingValue::single(10i64)));
        assert_eq!(order[1].get("user_id"), Some(&ShardingValue::single(2i64)));
        assert_eq!(order[1].get("order_id"), Some(&ShardingValue::single(11i64)));
    }

    #[test]
    fn test_missing_columns() {
        let rule = rule();
        let statement = insert("INSERT INTO t_order (status) VALUES ('new'), ('paid')");
        let conditions = ConditionExtractor::new(&rule, &statement, &[])
            .extract()
            .unwrap();

        // Tuples are kept, with nothing to shard on.
        let order = conditions.conditions("t_order");
        assert_eq!(order.len(), 2);
        assert!(order.iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_unknown_table() {
        let rule = rule();
        let statement = insert("INSERT INTO t_audit (id) VALUES (1)");
        let conditions = ConditionExtractor::new(&rule, &statement, &[])
            .extract()
            .unwrap();
        assert!(conditions.conditions("t_audit").is_empty());
    }

    #[test]
    fn test_missing_parameter() {
        let rule = rule();
        let statement = insert("INSERT INTO t_order (user_id, order_id) VALUES (?, ?)");
        let error = ConditionExtractor::new(&rule, &statement, &[Value::Integer(1)])
            .extract()
            .unwrap_err();
        assert!(matches!(error, Error::MissingParameter(1)));
    }
}
