//! Sharding functions.

pub mod hasher;
pub mod list;
pub mod range;
pub mod shard;
pub mod strategy;
pub mod value;

pub use hasher::Hasher;
pub use list::ListShards;
pub use range::Ranges;
pub use shard::Shard;
pub use strategy::{select, suffix, Algorithm, ShardingStrategy};
pub use value::ShardingValue;
