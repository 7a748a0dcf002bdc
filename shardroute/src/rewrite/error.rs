use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{tuples} value tuples but {conditions} sharding conditions")]
    ConditionCountMismatch { tuples: usize, conditions: usize },

    #[error("token at [{start}, {stop}) overlaps the previous one")]
    OverlappingTokens { start: usize, stop: usize },

    #[error("token at [{start}, {stop}) is outside the statement ({len} bytes)")]
    TokenOutOfBounds { start: usize, stop: usize, len: usize },

    #[error("{0}")]
    Route(#[from] crate::route::Error),
}
