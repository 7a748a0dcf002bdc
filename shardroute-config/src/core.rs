use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::read_to_string;
use std::path::Path;
use tracing::{info, warn};

use super::error::Error;
use super::general::General;
use super::sharding::{BindingTables, BroadcastTable, DataSource, StrategyConfig, TableConfig};

/// Configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// General configuration.
    #[serde(default)]
    pub general: General,

    /// Data sources.
    #[serde(default)]
    pub data_sources: Vec<DataSource>,

    /// Sharded tables.
    #[serde(default)]
    pub tables: Vec<TableConfig>,

    /// Groups of tables sharded identically.
    #[serde(default)]
    pub binding_tables: Vec<BindingTables>,

    /// Tables present on every data source.
    #[serde(default)]
    pub broadcast_tables: Vec<BroadcastTable>,

    /// Database strategy for tables that don't configure one.
    #[serde(default)]
    pub default_database_strategy: Option<StrategyConfig>,

    /// Table strategy for tables that don't configure one.
    #[serde(default)]
    pub default_table_strategy: Option<StrategyConfig>,
}

impl Config {
    /// Load configuration from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let source = read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = source.parse()?;
        info!("loaded \"{}\"", path.display());
        Ok(config)
    }

    /// Data source names, in declaration order.
    pub fn data_source_names(&self) -> Vec<&str> {
        self.data_sources.iter().map(|ds| ds.name.as_str()).collect()
    }

    /// Find a sharded table by name.
    pub fn table(&self, name: &str) -> Option<&TableConfig> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Validate the configuration. Hard errors are returned,
    /// questionable settings are logged.
    pub fn check(&self) -> Result<(), Error> {
        if self.data_sources.is_empty() {
            return Err(Error::NoDataSources);
        }

        let mut data_sources = HashSet::new();
        for data_source in &self.data_sources {
            if !data_sources.insert(data_source.name.as_str()) {
                return Err(Error::DuplicateDataSource(data_source.name.clone()));
            }
        }

        if let Some(ref default) = self.general.default_data_source {
            if !data_sources.contains(default.as_str()) {
                return Err(Error::UnknownDataSource {
                    table: "<default>".into(),
                    data_source: default.clone(),
                });
            }
        }

        let mut nodes_per_table = HashMap::new();
        for table in &self.tables {
            if nodes_per_table.contains_key(table.name.as_str()) {
                return Err(Error::DuplicateTable(table.name.clone()));
            }

            let nodes = match table.actual_data_nodes {
                Some(ref nodes) => nodes.expand()?,
                None => self
                    .data_sources
                    .iter()
                    .map(|ds| (ds.name.clone(), table.name.clone()))
                    .collect(),
            };

            for (data_source, _) in &nodes {
                if !data_sources.contains(data_source.as_str()) {
                    return Err(Error::UnknownDataSource {
                        table: table.name.clone(),
                        data_source: data_source.clone(),
                    });
                }
            }

            for strategy in [&table.database_strategy, &table.table_strategy]
                .into_iter()
                .flatten()
            {
                strategy.check()?;
            }

            if table.database_strategy.is_none()
                && table.table_strategy.is_none()
                && self.default_database_strategy.is_none()
                && self.default_table_strategy.is_none()
                && nodes.len() > 1
            {
                warn!(
                    "table \"{}\" has {} data nodes but no sharding strategy, every query will fan out",
                    table.name,
                    nodes.len()
                );
            }

            nodes_per_table.insert(table.name.as_str(), nodes);
        }

        for strategy in [&self.default_database_strategy, &self.default_table_strategy]
            .into_iter()
            .flatten()
        {
            strategy.check()?;
        }

        for broadcast in &self.broadcast_tables {
            if nodes_per_table.contains_key(broadcast.name.as_str()) {
                return Err(Error::BroadcastSharded(broadcast.name.clone()));
            }
        }

        for group in &self.binding_tables {
            let mut shape: Option<(&str, HashMap<&str, usize>)> = None;
            for table in &group.tables {
                let nodes = nodes_per_table
                    .get(table.as_str())
                    .ok_or_else(|| Error::UnknownBindingTable(table.clone()))?;
                let mut counts = HashMap::new();
                for (data_source, _) in nodes {
                    *counts.entry(data_source.as_str()).or_insert(0) += 1;
                }

                if let Some((first, expected)) = &shape {
                    if expected != &counts {
                        return Err(Error::BindingMismatch {
                            first: first.to_string(),
                            second: table.clone(),
                        });
                    }
                } else {
                    shape = Some((table.as_str(), counts));
                }
            }

            if group.tables.len() < 2 {
                warn!(
                    "binding group {:?} has fewer than two tables and has no effect",
                    group.tables
                );
            }
        }

        Ok(())
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        toml::from_str(source).map_err(|err| Error::config(source, err))
    }
}
