use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] shardroute_config::Error),

    #[error("actual table \"{actual_table}\" of \"{table}\" is not on data source \"{data_source}\"")]
    ActualTableNotFound {
        table: String,
        data_source: String,
        actual_table: String,
    },

    #[error("binding table \"{table}\" has no actual table on \"{data_source}\" at position {position}")]
    BindingActualTableNotFound {
        table: String,
        data_source: String,
        position: usize,
    },
}
