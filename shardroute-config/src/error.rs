//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Toml(#[from] toml::de::Error),

    #[error("\"{}\" could not be read: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error at line {line}, column {column}: {message}\n{snippet}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
        snippet: String,
    },

    #[error("inline expression \"{expression}\" is invalid: {reason}")]
    InlineExpression { expression: String, reason: String },

    #[error("data node \"{0}\" must be written as \"data_source.table\"")]
    DataNodeFormat(String),

    #[error("table \"{table}\" references undeclared data source \"{data_source}\"")]
    UnknownDataSource { table: String, data_source: String },

    #[error("table \"{0}\" is configured more than once")]
    DuplicateTable(String),

    #[error("data source \"{0}\" is declared more than once")]
    DuplicateDataSource(String),

    #[error("no data sources configured")]
    NoDataSources,

    #[error("binding table \"{0}\" is not a configured sharded table")]
    UnknownBindingTable(String),

    #[error("binding tables \"{first}\" and \"{second}\" don't have the same actual tables per data source")]
    BindingMismatch { first: String, second: String },

    #[error("table \"{0}\" can't be both sharded and broadcast")]
    BroadcastSharded(String),

    #[error("range mapping for shard {0} is empty or has mismatched bounds")]
    IncorrectRange(usize),

    #[error("strategy on column \"{0}\" has a zero shard count")]
    ZeroShards(String),
}

impl Error {
    /// Convert a TOML parse error into a readable error pointing
    /// at the offending line of the source.
    pub fn config(source: &str, err: toml::de::Error) -> Self {
        let span = match err.span() {
            Some(span) => span,
            None => return Self::Toml(err),
        };

        let mut line = 1;
        let mut line_start = 0;
        for (offset, c) in source.char_indices() {
            if offset >= span.start {
                break;
            }
            if c == '\n' {
                line += 1;
                line_start = offset + 1;
            }
        }

        let snippet = source[line_start..]
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();

        Self::Parse {
            line,
            column: span.start - line_start + 1,
            message: err.message().to_string(),
            snippet,
        }
    }
}
