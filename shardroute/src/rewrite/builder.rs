//! Assembles the SQL and parameters of each routing unit.

use std::collections::HashSet;

use super::{Error, SqlToken, Substitutable};
use crate::parser::Value;
use crate::route::RoutingUnit;

/// Statement text and parameters for one routing unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    pub sql: String,
    pub parameters: Vec<Value>,
}

/// Copies the statement text between tokens and renders each token
/// for a routing unit.
#[derive(Debug, Clone)]
pub struct SqlBuilder<'a> {
    sql: &'a str,
    parameters: &'a [Value],
    tokens: Vec<SqlToken>,
}

impl<'a> SqlBuilder<'a> {
    /// Sorts the tokens by position and checks that they fit the statement
    /// without overlapping.
    pub fn new(sql: &'a str, parameters: &'a [Value], mut tokens: Vec<SqlToken>) -> Result<Self, Error> {
        tokens.sort_by_key(|token| token.start());

        let mut previous = 0;
        for token in &tokens {
            let (start, stop) = (token.start(), token.stop());

            if start > stop
                || stop > sql.len()
                || !sql.is_char_boundary(start)
                || !sql.is_char_boundary(stop)
            {
                return Err(Error::TokenOutOfBounds {
                    start,
                    stop,
                    len: sql.len(),
                });
            }

            if start < previous {
                return Err(Error::OverlappingTokens { start, stop });
            }

            previous = stop;
        }

        Ok(Self {
            sql,
            parameters,
            tokens,
        })
    }

    pub fn tokens(&self) -> &[SqlToken] {
        &self.tokens
    }

    /// SQL and parameters for the unit. `None` if the statement inserts
    /// nothing there.
    pub fn build(&self, unit: &RoutingUnit) -> Option<Rewritten> {
        let nodes = unit.data_nodes();
        let mut sql = String::with_capacity(self.sql.len());
        let mut excluded = HashSet::new();
        let mut cursor = 0;

        for token in &self.tokens {
            sql.push_str(&self.sql[cursor..token.start()]);

            match token {
                SqlToken::Table(table) => sql.push_str(table.to_sql(unit)),
                SqlToken::InsertValues(values) => {
                    sql.push_str(&values.to_sql(self.sql, &nodes)?);
                    excluded.extend(values.excluded_parameters(&nodes));
                }
            }

            cursor = token.stop();
        }

        sql.push_str(&self.sql[cursor..]);

        let parameters = self
            .parameters
            .iter()
            .enumerate()
            .filter(|(position, _)| !excluded.contains(position))
            .map(|(_, parameter)| parameter.clone())
            .collect();

        Some(Rewritten { sql, parameters })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::condition::{ConditionExtractor, ConditionProvider};
    use crate::rewrite::{InsertValuesTokenGenerator, TableToken};
    use crate::route::{route, TableUnit};
    use crate::test::{insert, rule};

    #[test]
    fn test_insert_split_by_data_source() {
        let rule = rule();
        let statement = insert(
            "INSERT INTO t_user (user_id, name) VALUES (?, 'a'), (?, 'b'), (?, 'c')",
        );
        let parameters = [Value::Integer(10), Value::Integer(11), Value::Integer(12)];
        let conditions = ConditionExtractor::new(&rule, &statement, &parameters)
            .extract()
            .unwrap();
        let result = route(&rule, &statement.logical_tables(), &conditions).unwrap();
        assert_eq!(result.len(), 2);

        let token = InsertValuesTokenGenerator::new(&rule)
            .generate(&statement, Some(conditions.conditions("t_user")))
            .unwrap()
            .unwrap();
        let tuples = statement.insert_values();
        assert_eq!(token.start(), tuples[0].start);
        assert_eq!(token.stop(), tuples[2].stop);

        let builder = SqlBuilder::new(statement.sql(), &parameters, vec![token.into()]).unwrap();
        let rewritten = result
            .units()
            .map(|unit| (unit.data_source(), builder.build(unit).unwrap()))
            .collect::<Vec<_>>();

        assert_eq!(rewritten[0].0, "ds_0");
        assert_eq!(
            rewritten[0].1.sql,
            "INSERT INTO t_user (user_id, name) VALUES (?, 'a'), (?, 'c')"
        );
        assert_eq!(
            rewritten[0].1.parameters,
            vec![Value::Integer(10), Value::Integer(12)]
        );

        assert_eq!(rewritten[1].0, "ds_1");
        assert_eq!(
            rewritten[1].1.sql,
            "INSERT INTO t_user (user_id, name) VALUES (?, 'b')"
        );
        assert_eq!(rewritten[1].1.parameters, vec![Value::Integer(11)]);
    }

    #[test]
    fn test_round_trip() {
        let rule = rule();
        let statement = insert("INSERT INTO t_user (user_id) VALUES (1), (2), (3), (4)");
        let conditions = ConditionExtractor::new(&rule, &statement, &[])
            .extract()
            .unwrap();
        let token = InsertValuesTokenGenerator::new(&rule)
            .generate(&statement, Some(conditions.conditions("t_user")))
            .unwrap()
            .unwrap();

        for (data_source, expected) in [("ds_0", "(2), (4)"), ("ds_1", "(1), (3)")] {
            let nodes = [crate::rule::DataNode::new(data_source, "t_user")];
            assert_eq!(token.to_sql(statement.sql(), &nodes).unwrap(), expected);
        }

        let nodes = [crate::rule::DataNode::new("ds_2", "t_user")];
        assert!(token.to_sql(statement.sql(), &nodes).is_none());
    }

    #[test]
    fn test_table_tokens() {
        let sql = "SELECT * FROM t_order WHERE order_id = ?";
        let parameters = [Value::Integer(1)];
        let builder =
            SqlBuilder::new(sql, &parameters, vec![TableToken::new(14, 21, "t_order").into()])
                .unwrap();
        let unit = RoutingUnit::new("ds_1").with(TableUnit::new("t_order", "t_order_1"));

        let rewritten = builder.build(&unit).unwrap();
        assert_eq!(rewritten.sql, "SELECT * FROM t_order_1 WHERE order_id = ?");
        assert_eq!(rewritten.parameters, parameters);
    }

    #[test]
    fn test_validation() {
        let sql = "SELECT * FROM t_order";

        let error = SqlBuilder::new(sql, &[], vec![TableToken::new(14, 40, "t_order").into()])
            .unwrap_err();
        assert!(matches!(error, Error::TokenOutOfBounds { len: 21, .. }));

        let error = SqlBuilder::new(
            sql,
            &[],
            vec![
                TableToken::new(16, 21, "order").into(),
                TableToken::new(14, 21, "t_order").into(),
            ],
        )
        .unwrap_err();
        assert!(matches!(error, Error::OverlappingTokens { start: 16, stop: 21 }));
    }
}
