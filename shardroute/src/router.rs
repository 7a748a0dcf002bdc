//! Statement in, SQL per data source out.

use serde::Serialize;
use tracing::debug;

use crate::condition::{ConditionExtractor, ConditionProvider};
use crate::parser::{Statement, StatementKind, Value};
use crate::rewrite::{self, InsertValuesTokenGenerator, SqlBuilder, SqlToken};
use crate::route::{self, RoutingResult};
use crate::rule::ShardingRule;
use crate::Error;

/// Statement text and parameters to execute on one data source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionUnit {
    pub data_source: String,
    pub sql: String,
    pub parameters: Vec<Value>,
}

/// Routing decision and the statements it produced.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub routing: RoutingResult,
    pub units: Vec<ExecutionUnit>,
}

#[derive(Debug, Clone, Copy)]
pub struct Router<'a> {
    rule: &'a ShardingRule,
}

impl<'a> Router<'a> {
    pub fn new(rule: &'a ShardingRule) -> Self {
        Self { rule }
    }

    /// Route the statement and rewrite it for every routing unit.
    pub fn plan(&self, statement: &Statement, parameters: &[Value]) -> Result<Plan, Error> {
        let conditions = ConditionExtractor::new(self.rule, statement, parameters).extract()?;
        let routing = route::route(self.rule, &statement.logical_tables(), &conditions)?;

        let mut tokens = rewrite::table::generate(self.rule, statement)
            .into_iter()
            .map(SqlToken::from)
            .collect::<Vec<_>>();

        if let StatementKind::Insert(ref insert) = statement.kind {
            let ordered = self
                .rule
                .table_rule(&insert.table)
                .map(|_| conditions.conditions(&insert.table));

            if let Some(token) = InsertValuesTokenGenerator::new(self.rule).generate(statement, ordered)? {
                tokens.push(token.into());
            }
        }

        let builder = SqlBuilder::new(statement.sql(), parameters, tokens)?;
        let units = routing
            .units()
            .filter_map(|unit| {
                builder.build(unit).map(|rewritten| ExecutionUnit {
                    data_source: unit.data_source().to_string(),
                    sql: rewritten.sql,
                    parameters: rewritten.parameters,
                })
            })
            .collect::<Vec<_>>();

        debug!(
            "{} routing units, {} statements",
            routing.len(),
            units.len()
        );

        Ok(Plan { routing, units })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::{ColumnRef, Predicate, WhereClause};
    use crate::test::{insert, rule, select};

    #[test]
    fn test_insert_two_data_sources() {
        let rule = rule();
        let statement = insert(
            "INSERT INTO t_order (user_id, order_id, status) VALUES (0, 0, 'a'), (1, 1, 'b'), (2, 0, ?)",
        );
        let parameters = [Value::String("c".into())];

        let plan = Router::new(&rule).plan(&statement, &parameters).unwrap();

        assert_eq!(
            plan.units,
            vec![
                ExecutionUnit {
                    data_source: "ds_0".into(),
                    sql: "INSERT INTO t_order_0 (user_id, order_id, status) VALUES (0, 0, 'a'), (2, 0, ?)".into(),
                    parameters: vec![Value::String("c".into())],
                },
                ExecutionUnit {
                    data_source: "ds_1".into(),
                    sql: "INSERT INTO t_order_1 (user_id, order_id, status) VALUES (1, 1, 'b')".into(),
                    parameters: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_select_join_with_broadcast() {
        let rule = rule();
        let statement = select(
            "SELECT * FROM t_order o JOIN t_order_item i ON o.order_id = i.order_id JOIN t_config c ON c.id = o.config_id WHERE o.user_id = ? AND o.order_id = ?",
            &["t_order o", "t_order_item i", "t_config c"],
            Some(WhereClause::and(vec![
                Predicate::eq(ColumnRef::qualified("o", "user_id"), Value::Placeholder(0)),
                Predicate::eq(ColumnRef::qualified("o", "order_id"), Value::Placeholder(1)),
            ])),
        );
        let parameters = [Value::Integer(1), Value::Integer(3)];

        let plan = Router::new(&rule).plan(&statement, &parameters).unwrap();

        assert_eq!(plan.units.len(), 1);
        assert_eq!(plan.units[0].data_source, "ds_1");
        assert_eq!(
            plan.units[0].sql,
            "SELECT * FROM t_order_1 o JOIN t_order_item_1 i ON o.order_id = i.order_id JOIN t_config c ON c.id = o.config_id WHERE o.user_id = ? AND o.order_id = ?"
        );
        assert_eq!(plan.units[0].parameters, parameters);
    }

    #[test]
    fn test_fan_out() {
        let rule = rule();
        let statement = select("SELECT count(*) FROM t_user", &["t_user"], None);
        let plan = Router::new(&rule).plan(&statement, &[]).unwrap();

        assert_eq!(plan.routing.data_source_names(), vec!["ds_0", "ds_1"]);
        assert!(plan.units.iter().all(|unit| unit.sql == statement.sql()));
    }

    #[test]
    fn test_errors() {
        let rule = rule();
        let statement = select("SELECT * FROM t_audit", &["t_audit"], None);
        assert!(matches!(
            Router::new(&rule).plan(&statement, &[]),
            Err(Error::Route(route::Error::TableNotFoundInRule(_)))
        ));

        let statement = insert("INSERT INTO t_user (user_id) VALUES (?)");
        assert!(matches!(
            Router::new(&rule).plan(&statement, &[]),
            Err(Error::Condition(_))
        ));
    }
}
