use std::collections::HashMap;

use shardroute_config::{FlexibleType, ShardedMapping};

use super::Shard;

/// Explicit value to shard mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListShards {
    mapping: HashMap<FlexibleType, usize>,
}

impl ListShards {
    pub fn new(mappings: &[ShardedMapping]) -> Self {
        let mut mapping = HashMap::new();

        for map in mappings {
            for value in &map.values {
                mapping.insert(value.clone(), map.shard);
            }
        }

        Self { mapping }
    }

    /// Shard for the value. Values that aren't listed go everywhere.
    pub fn shard(&self, value: &FlexibleType) -> Shard {
        if let Some(shard) = self.mapping.get(value) {
            Shard::Direct(*shard)
        } else {
            Shard::All
        }
    }
}
