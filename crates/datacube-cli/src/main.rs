//! datacube - CLI tool for the DataCube document-database service.
//!
//! A thin wrapper over `datacube-http` for manual exploration and scripting.
//! Records go to stdout as JSON lines; status messages go to stderr.

mod cli;
mod commands;
mod output;
mod profile;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{collection, config, database, document};

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        verbose,
        json_logs,
        connection,
        command,
    } = Cli::parse();

    init_logging(verbose, json_logs);

    match command {
        Commands::Database(cmd) => database::handle(cmd, &connection).await,
        Commands::Collection(cmd) => collection::handle(cmd, &connection).await,
        Commands::Document(cmd) => document::handle(cmd, &connection).await,
        Commands::Config(cmd) => config::handle(cmd, &connection),
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs share stderr with status lines; stdout carries records only.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
