use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shardroute_config::split_data_node;

use super::Error;
use crate::sharding::suffix;

/// One physical table on one data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DataNode {
    data_source: String,
    table: String,
}

impl DataNode {
    pub fn new(data_source: impl ToString, table: impl ToString) -> Self {
        Self {
            data_source: data_source.to_string(),
            table: table.to_string(),
        }
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    /// Actual table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Shard suffix of the actual table, if it has one.
    pub fn suffix(&self) -> Option<usize> {
        suffix(&self.table)
    }
}

impl Display for DataNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.data_source, self.table)
    }
}

impl FromStr for DataNode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (data_source, table) = split_data_node(s)?;
        Ok(Self { data_source, table })
    }
}
