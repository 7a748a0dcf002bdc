//! Errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Config(#[from] shardroute_config::Error),

    #[error("{0}")]
    Rule(#[from] crate::rule::Error),

    #[error("{0}")]
    Condition(#[from] crate::condition::Error),

    #[error("{0}")]
    Route(#[from] crate::route::Error),

    #[error("{0}")]
    Rewrite(#[from] crate::rewrite::Error),

    #[error("\"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
