//! Sharding router.
//!
//! Given a parsed statement and its parameters, finds the data sources and
//! actual tables it must run on, and rewrites it for each of them.

pub mod cli;
pub mod condition;
pub mod config;
pub mod error;
pub mod logger;
pub mod parser;
pub mod rewrite;
pub mod route;
pub mod router;
pub mod rule;
pub mod sharding;


pub use error::Error;
pub use route::route;
pub use router::{ExecutionUnit, Plan, Router};
