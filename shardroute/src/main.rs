use std::process::exit;

use clap::Parser;
use shardroute::cli::{self, Cli, Commands};
use shardroute::logger;
use tracing::error;

fn main() {
    let args = Cli::parse();
    logger::init(args.log_format);

    let result = match args.command {
        Commands::Configcheck => cli::config_check(&args.config),
        Commands::Route {
            ref statement,
            ref parameters,
            json,
        } => cli::route(&args.config, statement, parameters.as_deref(), json),
        Commands::Schema => cli::schema(),
    };

    if let Err(err) = result {
        error!("{}", err);
        exit(1);
    }
}
