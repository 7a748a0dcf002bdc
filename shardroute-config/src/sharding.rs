use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;

use super::error::Error;
use super::inline;

/// Data source (physical database) the router can send statements to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DataSource {
    /// Name referenced by data nodes, e.g. `ds_0`.
    pub name: String,
}

/// Sharded table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct TableConfig {
    /// Logical table name, as written in queries.
    pub name: String,
    /// Physical tables backing the logical table. If none specified,
    /// the table is expected on every data source under its logical name.
    #[serde(default)]
    pub actual_data_nodes: Option<DataNodes>,
    /// Strategy picking the data source.
    #[serde(default)]
    pub database_strategy: Option<StrategyConfig>,
    /// Strategy picking the actual table inside the data source.
    #[serde(default)]
    pub table_strategy: Option<StrategyConfig>,
}

/// Actual data nodes, either enumerated or as an inline expression.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum DataNodes {
    Inline(String),
    List(Vec<String>),
}

impl DataNodes {
    /// Expand into `(data source, actual table)` pairs, in declaration order.
    pub fn expand(&self) -> Result<Vec<(String, String)>, Error> {
        let nodes = match self {
            Self::Inline(expression) => inline::expand(expression)?,
            Self::List(list) => {
                let mut nodes = vec![];
                for entry in list {
                    nodes.extend(inline::expand(entry)?);
                }
                nodes
            }
        };

        nodes.iter().map(|node| split_data_node(node)).collect()
    }
}

/// Split `ds_0.t_order_0` into its data source and table.
pub fn split_data_node(node: &str) -> Result<(String, String), Error> {
    let node = node.trim();
    match node.split_once('.') {
        Some((data_source, table)) if !data_source.is_empty() && !table.is_empty() => {
            Ok((data_source.to_string(), table.to_string()))
        }
        _ => Err(Error::DataNodeFormat(node.to_string())),
    }
}

/// Sharding strategy: which column drives the decision and how.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct StrategyConfig {
    /// Sharding column.
    pub column: String,
    /// Sharding function.
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Hash function, used by the `hash` algorithm.
    #[serde(default)]
    pub hasher: Hasher,
    /// Number of shards. Defaults to the number of candidate targets.
    #[serde(default)]
    pub shards: Option<usize>,
    /// Explicit mappings for `list` and `range` algorithms.
    #[serde(default)]
    pub mappings: Vec<ShardedMapping>,
}

impl StrategyConfig {
    pub fn check(&self) -> Result<(), Error> {
        if self.shards == Some(0) {
            return Err(Error::ZeroShards(self.column.clone()));
        }

        if self.algorithm == Algorithm::Range {
            for mapping in &self.mappings {
                mapping.check_range()?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Integer value modulo the shard count.
    #[default]
    Modulo,
    /// Hash of the value modulo the shard count.
    Hash,
    /// Explicit value lists.
    List,
    /// Explicit `[start, end)` ranges.
    Range,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Hasher {
    #[default]
    Sha1,
    Crc32c,
}

/// Value to shard mapping used by list and range strategies.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, Eq, JsonSchema)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct ShardedMapping {
    /// Inclusive lower bound (range).
    #[serde(default)]
    pub start: Option<FlexibleType>,
    /// Exclusive upper bound (range).
    #[serde(default)]
    pub end: Option<FlexibleType>,
    /// Values mapped to the shard (list).
    #[serde(default)]
    pub values: HashSet<FlexibleType>,
    /// Shard number.
    pub shard: usize,
}

impl ShardedMapping {
    fn check_range(&self) -> Result<(), Error> {
        let valid = match (&self.start, &self.end) {
            (None, None) => false,
            (Some(FlexibleType::Integer(start)), Some(FlexibleType::Integer(end))) => start < end,
            (Some(FlexibleType::String(start)), Some(FlexibleType::String(end))) => start < end,
            (Some(_), Some(_)) => false,
            _ => true,
        };

        if valid {
            Ok(())
        } else {
            Err(Error::IncorrectRange(self.shard))
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Eq, Hash, JsonSchema)]
#[serde(untagged)]
pub enum FlexibleType {
    Integer(i64),
    Uuid(uuid::Uuid),
    String(String),
}

impl Display for FlexibleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{}", i),
            Self::Uuid(u) => write!(f, "{}", u),
            Self::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for FlexibleType {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<uuid::Uuid> for FlexibleType {
    fn from(value: uuid::Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<String> for FlexibleType {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FlexibleType {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Tables that always shard identically and can be joined
/// without crossing shards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BindingTables {
    pub tables: Vec<String>,
}

/// Table replicated with the same name on every data source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BroadcastTable {
    pub name: String,
}
