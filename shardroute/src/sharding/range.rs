use shardroute_config::{FlexibleType, ShardedMapping};

use super::Shard;

/// `[start, end)` to shard mappings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ranges {
    mappings: Vec<ShardedMapping>,
}

impl Ranges {
    pub fn new(mappings: &[ShardedMapping]) -> Self {
        Self {
            mappings: mappings.to_vec(),
        }
    }

    /// Shard containing the value.
    pub fn shard(&self, value: &FlexibleType) -> Shard {
        for mapping in &self.mappings {
            if Range::new(mapping).contains(value) {
                return Shard::Direct(mapping.shard);
            }
        }

        Shard::All
    }

    /// Shards overlapping `[start, end]`.
    pub fn shard_range(&self, start: &FlexibleType, end: &FlexibleType) -> Shard {
        let mut shards = self
            .mappings
            .iter()
            .filter(|mapping| Range::new(mapping).overlaps(start, end))
            .map(|mapping| mapping.shard)
            .collect::<Vec<_>>();

        if shards.is_empty() {
            return Shard::All;
        }

        shards.sort_unstable();
        shards.dedup();

        if shards.len() == 1 {
            Shard::Direct(shards[0])
        } else {
            Shard::Multi(shards)
        }
    }
}

#[derive(Debug)]
struct Range<'a> {
    start: &'a Option<FlexibleType>,
    end: &'a Option<FlexibleType>,
}

impl<'a> Range<'a> {
    fn new(mapping: &'a ShardedMapping) -> Self {
        Self {
            start: &mapping.start,
            end: &mapping.end,
        }
    }

    fn contains(&self, value: &FlexibleType) -> bool {
        match value {
            FlexibleType::Integer(integer) => self.integer(*integer, *integer),
            FlexibleType::String(varchar) => self.varchar(varchar, varchar),
            FlexibleType::Uuid(_) => false,
        }
    }

    fn overlaps(&self, start: &FlexibleType, end: &FlexibleType) -> bool {
        match (start, end) {
            (FlexibleType::Integer(start), FlexibleType::Integer(end)) => {
                self.integer(*start, *end)
            }
            (FlexibleType::String(start), FlexibleType::String(end)) => self.varchar(start, end),
            _ => false,
        }
    }

    /// `[low, high]` intersects the mapping.
    fn integer(&self, low: i64, high: i64) -> bool {
        let above_start = match self.start {
            Some(FlexibleType::Integer(start)) => high >= *start,
            Some(_) => return false,
            None => true,
        };
        let below_end = match self.end {
            Some(FlexibleType::Integer(end)) => low < *end,
            Some(_) => return false,
            None => true,
        };
        above_start && below_end && (self.start.is_some() || self.end.is_some())
    }

    fn varchar(&self, low: &str, high: &str) -> bool {
        let above_start = match self.start {
            Some(FlexibleType::String(start)) => high >= start.as_str(),
            Some(_) => return false,
            None => true,
        };
        let below_end = match self.end {
            Some(FlexibleType::String(end)) => low < end.as_str(),
            Some(_) => return false,
            None => true,
        };
        above_start && below_end && (self.start.is_some() || self.end.is_some())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ranges() -> Ranges {
        Ranges::new(&[
            ShardedMapping {
                end: Some(FlexibleType::Integer(100)),
                shard: 0,
                ..Default::default()
            },
            ShardedMapping {
                start: Some(FlexibleType::Integer(100)),
                end: Some(FlexibleType::Integer(200)),
                shard: 1,
                ..Default::default()
            },
            ShardedMapping {
                start: Some(FlexibleType::Integer(200)),
                shard: 2,
                ..Default::default()
            },
            ShardedMapping {
                start: Some(FlexibleType::String("a".into())),
                end: Some(FlexibleType::String("m".into())),
                shard: 0,
                ..Default::default()
            },
        ])
    }

    #[test]
    fn test_range_value() {
        let ranges = ranges();
        assert_eq!(ranges.shard(&FlexibleType::Integer(-5)), Shard::Direct(0));
        assert_eq!(ranges.shard(&FlexibleType::Integer(100)), Shard::Direct(1));
        assert_eq!(ranges.shard(&FlexibleType::Integer(199)), Shard::Direct(1));
        assert_eq!(ranges.shard(&FlexibleType::Integer(5000)), Shard::Direct(2));
        assert_eq!(ranges.shard(&"banana".into()), Shard::Direct(0));
        assert_eq!(ranges.shard(&"zebra".into()), Shard::All);
    }

    #[test]
    fn test_range_overlap() {
        let ranges = ranges();
        assert_eq!(
            ranges.shard_range(&FlexibleType::Integer(150), &FlexibleType::Integer(250)),
            Shard::Multi(vec![1, 2])
        );
        assert_eq!(
            ranges.shard_range(&FlexibleType::Integer(10), &FlexibleType::Integer(99)),
            Shard::Direct(0)
        );
        assert_eq!(
            ranges.shard_range(&FlexibleType::Integer(99), &FlexibleType::Integer(100)),
            Shard::Multi(vec![0, 1])
        );
    }
}
