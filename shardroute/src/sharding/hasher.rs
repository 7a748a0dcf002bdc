use sha1::{Digest, Sha1};
use shardroute_config::{FlexibleType, Hasher as HasherConfig};

/// Hash function used by the `hash` algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hasher {
    #[default]
    Sha1,
    Crc32c,
}

impl Hasher {
    /// Hash a sharding key.
    pub fn hash(&self, value: &FlexibleType) -> u64 {
        let bytes = match value {
            FlexibleType::Integer(integer) => integer.to_be_bytes().to_vec(),
            FlexibleType::Uuid(uuid) => uuid.as_bytes().to_vec(),
            FlexibleType::String(string) => string.as_bytes().to_vec(),
        };

        match self {
            Hasher::Sha1 => {
                let digest = Sha1::digest(&bytes);
                let mut head = [0u8; 8];
                head.copy_from_slice(&digest[..8]);
                u64::from_be_bytes(head)
            }
            Hasher::Crc32c => crc32c::crc32c(&bytes) as u64,
        }
    }
}

impl From<HasherConfig> for Hasher {
    fn from(value: HasherConfig) -> Self {
        match value {
            HasherConfig::Sha1 => Hasher::Sha1,
            HasherConfig::Crc32c => Hasher::Crc32c,
        }
    }
}
