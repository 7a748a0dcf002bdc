// Submodules
pub mod core;
pub mod error;
pub mod general;
pub mod inline;
pub mod sharding;

pub use core::Config;
pub use error::Error;
pub use general::{General, IncompleteConditions};
pub use inline::expand;
pub use sharding::*;
