use shardroute_config::IncompleteConditions;

use super::*;
use crate::condition::{ShardingCondition, ShardingConditions};
use crate::sharding::ShardingValue;
use crate::test::rule;

fn shard_one(tables: &[&str]) -> ShardingConditions {
    tables.iter().fold(ShardingConditions::new(), |conditions, table| {
        conditions.with(
            table,
            vec![ShardingCondition::new()
                .with("user_id", ShardingValue::single(1i64))
                .with("order_id", ShardingValue::single(1i64))],
        )
    })
}

#[test]
fn test_binding_tables_single_unit() {
    let rule = rule();
    let result = route(
        &rule,
        &["t_order", "t_order_item"],
        &shard_one(&["t_order"]),
    )
    .unwrap();

    assert!(result.is_single());
    let unit = result.units().next().unwrap();
    assert_eq!(unit.data_source(), "ds_1");
    assert_eq!(unit.actual_table("t_order"), Some("t_order_1"));
    assert_eq!(unit.actual_table("t_order_item"), Some("t_order_item_1"));
}

#[test]
fn test_sharded_with_broadcast() {
    let rule = rule();
    let result = route(&rule, &["t_order", "t_config"], &shard_one(&["t_order"])).unwrap();

    assert_eq!(
        result.units().collect::<Vec<_>>(),
        vec![&RoutingUnit::new("ds_1")
            .with(TableUnit::new("t_order", "t_order_1"))
            .with(TableUnit::new("t_config", "t_config"))]
    );
}

#[test]
fn test_empty_tables() {
    let error = route(&ShardingRule::default(), &[], &ShardingConditions::new()).unwrap_err();
    assert!(matches!(error, Error::TableNotFoundInRule(ref tables) if tables.is_empty()));

    let error = route(&rule(), &[], &ShardingConditions::new()).unwrap_err();
    assert!(matches!(error, Error::TableNotFoundInRule(_)));
}

#[test]
fn test_unknown_table() {
    let rule = rule();
    let error = route(&rule, &["t_order", "t_audit"], &ShardingConditions::new()).unwrap_err();
    assert!(
        matches!(error, Error::TableNotFoundInRule(ref tables) if tables == &["t_audit".to_string()])
    );

    // Unconfigured tables live on the default data source, if there is one.
    let rule = rule.with_default_data_source("ds_0");
    let result = route(&rule, &["t_audit"], &ShardingConditions::new()).unwrap();
    assert!(result.is_single());
    let unit = result.units().next().unwrap();
    assert_eq!(unit.data_source(), "ds_0");
    assert_eq!(unit.actual_table("t_audit"), Some("t_audit"));
}

#[test]
fn test_only_broadcast_tables() {
    let rule = rule().with_broadcast_table("t_dict");
    let result = route(&rule, &["t_config", "t_dict"], &ShardingConditions::new()).unwrap();

    assert_eq!(result.data_source_names(), vec!["ds_0", "ds_1"]);
    for unit in result.units() {
        assert_eq!(unit.table_units().len(), 2);
        for table_unit in unit.table_units() {
            assert_eq!(table_unit.logical_table(), table_unit.actual_table());
        }
    }
}

#[test]
fn test_binding_fan_out() {
    let rule = rule();
    let result = route(
        &rule,
        &["t_order", "t_order_item", "t_config"],
        &ShardingConditions::new(),
    )
    .unwrap();

    assert_eq!(result.len(), 4);
    for unit in result.units() {
        let order = unit.actual_table("t_order").unwrap();
        let item = unit.actual_table("t_order_item").unwrap();
        assert_eq!(order.strip_prefix("t_order"), item.strip_prefix("t_order_item"));
        assert_eq!(unit.actual_table("t_config"), Some("t_config"));
        assert_eq!(unit.table_units().len(), 3);
    }
}

#[test]
fn test_complex_join() {
    let rule = rule();
    let conditions = ShardingConditions::new().with(
        "t_user",
        vec![ShardingCondition::new().with("user_id", ShardingValue::single(0i64))],
    );

    // t_order fans out to 4 nodes, t_user to ds_0: only ds_0 combinations survive.
    let result = route(&rule, &["t_order", "t_user"], &conditions).unwrap();
    assert_eq!(result.len(), 2);
    for unit in result.units() {
        assert_eq!(unit.data_source(), "ds_0");
        assert_eq!(unit.actual_table("t_user"), Some("t_user"));
    }
    assert_eq!(
        result.actual_tables("ds_0", "t_order"),
        vec!["t_order_0", "t_order_1"]
    );
}

#[test]
fn test_cross_data_source_join() {
    let rule = rule();
    let conditions = ShardingConditions::new()
        .with(
            "t_user",
            vec![ShardingCondition::new().with("user_id", ShardingValue::single(0i64))],
        )
        .with(
            "t_order",
            vec![ShardingCondition::new()
                .with("user_id", ShardingValue::single(1i64))
                .with("order_id", ShardingValue::single(1i64))],
        );

    let error = route(&rule, &["t_order", "t_user"], &conditions).unwrap_err();
    assert!(matches!(error, Error::CrossDataSourceJoin(_)));
}

#[test]
fn test_no_unit_spans_data_sources() {
    let rule = rule().with_broadcast_table("t_dict");
    let result = route(
        &rule,
        &["t_order", "t_user", "t_order_item", "t_dict"],
        &ShardingConditions::new(),
    )
    .unwrap();

    assert!(result.units().count() > 0);
    for unit in result.units() {
        assert_eq!(unit.table_units().len(), 4);
        for table in unit.table_units() {
            match rule.table_rule(table.logical_table()) {
                Some(table_rule) => assert!(
                    table_rule
                        .actual_tables(unit.data_source())
                        .contains(&table.actual_table()),
                    "{} is not on {}",
                    table.actual_table(),
                    unit.data_source()
                ),
                None => assert_eq!(table.actual_table(), table.logical_table()),
            }
        }
    }
}

#[test]
fn test_value_without_data_node() {
    let config: shardroute_config::Config = r#"
[[data_sources]]
name = "ds_0"

[[tables]]
name = "t_order"
actual_data_nodes = "ds_0.t_order_${1..2}"
table_strategy = { column = "order_id" }
"#
    .parse()
    .unwrap();
    let rule = ShardingRule::new(&config).unwrap();
    let by_order = |order_id: i64| {
        ShardingConditions::new().with(
            "t_order",
            vec![ShardingCondition::new().with("order_id", ShardingValue::single(order_id))],
        )
    };

    let result = route(&rule, &["t_order"], &by_order(1)).unwrap();
    assert!(result.is_single());
    let unit = result.units().next().unwrap();
    assert_eq!(unit.actual_table("t_order"), Some("t_order_1"));

    let error = route(&rule, &["t_order"], &by_order(2)).unwrap_err();
    assert!(matches!(error, Error::NoDataNode { .. }));
}

#[test]
fn test_engine_selection() {
    let rule = rule();

    let engine = RoutingEngine::new(&rule, &["t_config"]).unwrap();
    assert_eq!(engine.kind(), EngineKind::Broadcast);

    let engine = RoutingEngine::new(&rule, &["t_order", "t_order_item", "t_config"]).unwrap();
    assert_eq!(engine.kind(), EngineKind::Standard);
    assert_eq!(engine.tables(), vec!["t_order", "t_order_item", "t_config"]);

    let engine = RoutingEngine::new(&rule, &["t_order", "t_user", "t_order"]).unwrap();
    assert_eq!(engine.kind(), EngineKind::Complex);
    assert_eq!(engine.tables(), vec!["t_order", "t_user"]);
}

#[test]
fn test_incomplete_conditions_policy() {
    let rule = rule().with_incomplete_conditions(IncompleteConditions::Error);
    let error = route(&rule, &["t_user"], &ShardingConditions::new()).unwrap_err();
    assert!(matches!(error, Error::IncompleteShardingCondition { .. }));

    // Broadcast tables have nothing to be incomplete about.
    assert!(route(&rule, &["t_config"], &ShardingConditions::new()).is_ok());
}
