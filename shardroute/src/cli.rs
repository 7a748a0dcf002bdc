use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use shardroute_config::Config;
use tracing::info;

use crate::config;
use crate::logger::LogFormat;
use crate::parser::{Statement, Value};
use crate::router::Router;
use crate::Error;

/// Routes SQL statements over sharded tables and rewrites them
/// for each data source.
#[derive(Parser, Debug)]
#[command(name = "shardroute", version)]
pub struct Cli {
    /// Path to the configuration file. Default: "shardroute.toml"
    #[arg(short, long, default_value = "shardroute.toml")]
    pub config: PathBuf,
    /// Log format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
    /// Subcommand.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check the configuration file for errors.
    Configcheck,

    /// Route a statement and print the SQL for each data source.
    Route {
        /// Path to the parsed statement, as JSON.
        #[arg(short, long)]
        statement: PathBuf,

        /// Statement parameters, as a JSON array.
        #[arg(short, long)]
        parameters: Option<String>,

        /// Print the whole plan as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the JSON schema of the configuration file.
    Schema,
}

/// Confirm that the configuration file is valid.
pub fn config_check(path: &Path) -> Result<(), Error> {
    let config = config::load(path)?;
    info!(
        "\"{}\" is valid: {} data sources, {} tables",
        path.display(),
        config.config.data_sources.len(),
        config.config.tables.len()
    );
    Ok(())
}

/// Route a statement read from a file.
#[allow(clippy::print_stdout)]
pub fn route(
    config_path: &Path,
    statement: &Path,
    parameters: Option<&str>,
    json: bool,
) -> Result<(), Error> {
    let rule = config::load(config_path)?.rule.clone();

    let source = read_to_string(statement).map_err(|source| Error::Io {
        path: statement.to_path_buf(),
        source,
    })?;
    let statement: Statement = serde_json::from_str(&source)?;

    let parameters = match parameters {
        Some(parameters) => serde_json::from_str::<Vec<serde_json::Value>>(parameters)?
            .into_iter()
            .map(Value::from)
            .collect(),
        None => vec![],
    };

    let plan = Router::new(&rule).plan(&statement, &parameters)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        for unit in &plan.units {
            println!("[{}] {}", unit.data_source, unit.sql);
            if !unit.parameters.is_empty() {
                let parameters = unit
                    .parameters
                    .iter()
                    .map(|parameter| parameter.to_string())
                    .collect::<Vec<_>>();
                println!("  parameters: {}", parameters.join(", "));
            }
        }
    }

    Ok(())
}

/// Print the configuration file schema.
#[allow(clippy::print_stdout)]
pub fn schema() -> Result<(), Error> {
    let schema = schemars::schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
