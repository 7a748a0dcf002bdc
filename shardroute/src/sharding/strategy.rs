use shardroute_config::{Algorithm as AlgorithmConfig, FlexibleType, StrategyConfig};
use tracing::trace;

use super::{Hasher, ListShards, Ranges, Shard, ShardingValue};

/// Integer ranges larger than this aren't enumerated; they go to every shard.
const MAX_RANGE_ENUMERATION: i64 = 256;

/// Sharding function.
#[derive(Debug, Clone, PartialEq)]
pub enum Algorithm {
    Modulo,
    Hash(Hasher),
    List(ListShards),
    Range(Ranges),
}

/// Column + function mapping a sharding value to shard numbers,
/// and shard numbers to targets (data sources or actual tables).
#[derive(Debug, Clone, PartialEq)]
pub struct ShardingStrategy {
    column: String,
    algorithm: Algorithm,
    shards: Option<usize>,
}

impl ShardingStrategy {
    pub fn new(column: impl ToString, algorithm: Algorithm) -> Self {
        Self {
            column: column.to_string(),
            algorithm,
            shards: None,
        }
    }

    /// Fix the shard count instead of using the number of targets.
    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = Some(shards);
        self
    }

    /// Sharding column.
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// Shards selected by the value, out of `shards`.
    pub fn shard(&self, value: &ShardingValue, shards: usize) -> Shard {
        let shards = self.shards.unwrap_or(shards);
        if shards == 0 {
            return Shard::Multi(vec![]);
        }

        match value {
            ShardingValue::List(values) => values
                .iter()
                .map(|value| self.shard_one(value, shards))
                .reduce(Shard::merge)
                .unwrap_or(Shard::Multi(vec![])),

            ShardingValue::Range { start, end } => match &self.algorithm {
                Algorithm::Range(ranges) => {
                    trace!("sharding range using range mappings");
                    ranges.shard_range(start, end)
                }
                Algorithm::Modulo | Algorithm::Hash(_) => {
                    match (start, end) {
                        (FlexibleType::Integer(start), FlexibleType::Integer(end)) => {
                            if start > end {
                                Shard::Multi(vec![])
                            } else if end.saturating_sub(*start) >= MAX_RANGE_ENUMERATION {
                                Shard::All
                            } else {
                                (*start..=*end)
                                    .map(|value| {
                                        self.shard_one(&FlexibleType::Integer(value), shards)
                                    })
                                    .reduce(Shard::merge)
                                    .unwrap_or(Shard::All)
                            }
                        }
                        _ => Shard::All,
                    }
                }
                Algorithm::List(_) => Shard::All,
            },
        }
    }

    fn shard_one(&self, value: &FlexibleType, shards: usize) -> Shard {
        match &self.algorithm {
            Algorithm::Modulo => {
                trace!("sharding using modulo");
                match value {
                    FlexibleType::Integer(integer) => {
                        Shard::Direct(integer.rem_euclid(shards as i64) as usize)
                    }
                    _ => Shard::All,
                }
            }

            Algorithm::Hash(hasher) => {
                trace!("sharding using hash");
                Shard::Direct((hasher.hash(value) % shards as u64) as usize)
            }

            Algorithm::List(list) => {
                trace!("sharding using lists");
                list.shard(value)
            }

            Algorithm::Range(ranges) => {
                trace!("sharding using range");
                ranges.shard(value)
            }
        }
    }

    /// Targets selected by the value.
    pub fn route<'a>(&self, targets: &[&'a str], value: &ShardingValue) -> Vec<&'a str> {
        let shard = self.shard(value, targets.len());
        select(targets, &shard)
    }
}

impl From<&StrategyConfig> for ShardingStrategy {
    fn from(config: &StrategyConfig) -> Self {
        let algorithm = match config.algorithm {
            AlgorithmConfig::Modulo => Algorithm::Modulo,
            AlgorithmConfig::Hash => Algorithm::Hash(config.hasher.into()),
            AlgorithmConfig::List => Algorithm::List(ListShards::new(&config.mappings)),
            AlgorithmConfig::Range => Algorithm::Range(Ranges::new(&config.mappings)),
        };

        Self {
            column: config.column.clone(),
            algorithm,
            shards: config.shards,
        }
    }
}

/// Numeric suffix of a data source or table name, e.g. `1` for `t_order_1`.
pub fn suffix(name: &str) -> Option<usize> {
    let digits = name.len()
        - name
            .trim_end_matches(|c: char| c.is_ascii_digit())
            .len();

    if digits == 0 {
        None
    } else {
        name[name.len() - digits..].parse().ok()
    }
}

/// Pick targets matching the shard numbers. Targets are matched by
/// numeric suffix; if none of them has one, by position.
pub fn select<'a>(targets: &[&'a str], shard: &Shard) -> Vec<&'a str> {
    if shard.is_all() {
        return targets.to_vec();
    }

    let suffixed = targets.iter().any(|target| suffix(target).is_some());

    targets
        .iter()
        .enumerate()
        .filter(|(position, target)| {
            let number = if suffixed {
                suffix(target)
            } else {
                Some(*position)
            };
            number.map(|number| shard.contains(number)).unwrap_or(false)
        })
        .map(|(_, target)| *target)
        .collect()
}
