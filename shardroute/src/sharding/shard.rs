use std::fmt::Display;

/// Shards selected by a sharding function.
#[derive(Debug, Clone, PartialEq, PartialOrd, Ord, Eq, Hash, Default)]
pub enum Shard {
    /// Direct-to-shard number.
    Direct(usize),
    /// Multiple shards, enumerated. Empty when no shard can match.
    Multi(Vec<usize>),
    /// All shards.
    #[default]
    All,
}

impl Display for Shard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Direct(shard) => shard.to_string(),
                Self::Multi(shards) => format!("{:?}", shards),
                Self::All => "all".into(),
            }
        )
    }
}

impl Shard {
    /// Returns true if this selects every shard.
    pub fn is_all(&self) -> bool {
        matches!(self, Shard::All)
    }

    /// Returns true if the shard number is selected.
    pub fn contains(&self, shard: usize) -> bool {
        match self {
            Self::Direct(direct) => *direct == shard,
            Self::Multi(shards) => shards.contains(&shard),
            Self::All => true,
        }
    }

    /// Union of two shard selections.
    pub fn merge(self, other: Shard) -> Shard {
        let mut shards = match (self, other) {
            (Shard::All, _) | (_, Shard::All) => return Shard::All,
            (Shard::Direct(a), Shard::Direct(b)) => vec![a, b],
            (Shard::Direct(a), Shard::Multi(mut b)) | (Shard::Multi(mut b), Shard::Direct(a)) => {
                b.push(a);
                b
            }
            (Shard::Multi(mut a), Shard::Multi(b)) => {
                a.extend(b);
                a
            }
        };

        shards.sort_unstable();
        shards.dedup();

        if shards.len() == 1 {
            Shard::Direct(shards[0])
        } else {
            Shard::Multi(shards)
        }
    }
}
