use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no sharding, broadcast or default rule for tables [{}]", .0.join(", "))]
    TableNotFoundInRule(Vec<String>),

    #[error("no value for sharding column \"{column}\" of table \"{table}\"")]
    IncompleteShardingCondition { table: String, column: String },

    #[error("no data node of table \"{table}\" matches the value of \"{column}\"")]
    NoDataNode { table: String, column: String },

    #[error("tables [{}] share no data source", .0.join(", "))]
    CrossDataSourceJoin(Vec<String>),

    #[error("{0}")]
    Rule(#[from] crate::rule::Error),
}
