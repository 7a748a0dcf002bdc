use indexmap::IndexSet;

use super::DataNode;
use crate::sharding::ShardingStrategy;

/// Sharded logical table: where it physically lives and how rows are spread.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRule {
    logical_table: String,
    data_nodes: Vec<DataNode>,
    database_strategy: Option<ShardingStrategy>,
    table_strategy: Option<ShardingStrategy>,
}

impl TableRule {
    pub fn new(logical_table: impl ToString, data_nodes: Vec<DataNode>) -> Self {
        Self {
            logical_table: logical_table.to_string(),
            data_nodes,
            database_strategy: None,
            table_strategy: None,
        }
    }

    pub fn with_database_strategy(mut self, strategy: Option<ShardingStrategy>) -> Self {
        self.database_strategy = strategy;
        self
    }

    pub fn with_table_strategy(mut self, strategy: Option<ShardingStrategy>) -> Self {
        self.table_strategy = strategy;
        self
    }

    pub fn logical_table(&self) -> &str {
        &self.logical_table
    }

    /// All data nodes, in configuration order.
    pub fn data_nodes(&self) -> &[DataNode] {
        &self.data_nodes
    }

    pub fn database_strategy(&self) -> Option<&ShardingStrategy> {
        self.database_strategy.as_ref()
    }

    pub fn table_strategy(&self) -> Option<&ShardingStrategy> {
        self.table_strategy.as_ref()
    }

    /// Data sources the table lives on, in configuration order.
    pub fn data_source_names(&self) -> Vec<&str> {
        self.data_nodes
            .iter()
            .map(|node| node.data_source())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Actual tables on the data source, in configuration order.
    pub fn actual_tables(&self, data_source: &str) -> Vec<&str> {
        self.data_nodes
            .iter()
            .filter(|node| node.data_source() == data_source)
            .map(|node| node.table())
            .collect()
    }

    /// Position of the actual table among the tables of its data source.
    pub fn actual_table_position(&self, data_source: &str, actual_table: &str) -> Option<usize> {
        self.actual_tables(data_source)
            .iter()
            .position(|table| *table == actual_table)
    }

    /// Columns used by either strategy.
    pub fn sharding_columns(&self) -> Vec<&str> {
        let mut columns = vec![];
        for strategy in [&self.database_strategy, &self.table_strategy]
            .into_iter()
            .flatten()
        {
            if !columns.contains(&strategy.column()) {
                columns.push(strategy.column());
            }
        }
        columns
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sharding::Algorithm;

    fn rule() -> TableRule {
        TableRule::new(
            "t_order",
            vec![
                DataNode::new("ds_0", "t_order_0"),
                DataNode::new("ds_0", "t_order_1"),
                DataNode::new("ds_1", "t_order_0"),
                DataNode::new("ds_1", "t_order_1"),
            ],
        )
        .with_database_strategy(Some(ShardingStrategy::new("user_id", Algorithm::Modulo)))
        .with_table_strategy(Some(ShardingStrategy::new("order_id", Algorithm::Modulo)))
    }

    #[test]
    fn test_lookups() {
        let rule = rule();
        assert_eq!(rule.data_source_names(), vec!["ds_0", "ds_1"]);
        assert_eq!(rule.actual_tables("ds_1"), vec!["t_order_0", "t_order_1"]);
        assert!(rule.actual_tables("ds_9").is_empty());
        assert_eq!(rule.actual_table_position("ds_1", "t_order_1"), Some(1));
        assert_eq!(rule.sharding_columns(), vec!["user_id", "order_id"]);
    }
}
