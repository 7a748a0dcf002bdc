//! Broadcast tables: same name, same rows, every data source.

use super::{RoutingUnit, TableUnit};
use crate::rule::ShardingRule;

/// One unit per configured data source, each with every table at its
/// logical name.
pub fn route(rule: &ShardingRule, tables: &[&str]) -> Vec<RoutingUnit> {
    rule.data_sources()
        .iter()
        .map(|data_source| {
            tables.iter().fold(RoutingUnit::new(data_source), |unit, table| {
                unit.with(TableUnit::new(table, table))
            })
        })
        .collect()
}

/// Tag every unit with the broadcast tables.
pub fn merge(units: Vec<RoutingUnit>, tables: &[&str]) -> Vec<RoutingUnit> {
    units
        .into_iter()
        .map(|unit| {
            tables
                .iter()
                .fold(unit, |unit, table| unit.with(TableUnit::new(table, table)))
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::rule;

    #[test]
    fn test_every_data_source() {
        let units = route(&rule(), &["t_config", "t_dict"]);
        assert_eq!(units.len(), 2);
        for (unit, data_source) in units.iter().zip(["ds_0", "ds_1"]) {
            assert_eq!(unit.data_source(), data_source);
            assert_eq!(unit.actual_table("t_config"), Some("t_config"));
            assert_eq!(unit.actual_table("t_dict"), Some("t_dict"));
        }
    }

    #[test]
    fn test_merge() {
        let units = merge(
            vec![RoutingUnit::new("ds_1").with(TableUnit::new("t_order", "t_order_1"))],
            &["t_config"],
        );
        assert_eq!(units[0].table_units().len(), 2);
        assert_eq!(units[0].actual_table("t_config"), Some("t_config"));
    }
}
