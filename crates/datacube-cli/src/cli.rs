//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use datacube_http::{ENV_API_KEY, ENV_BASE_URL, ENV_TIMEOUT_SECS};

use crate::commands::collection::CollectionCommand;
use crate::commands::config::ConfigCommand;
use crate::commands::database::DatabaseCommand;
use crate::commands::document::DocumentCommand;

/// DataCube CLI tool for managing databases, collections and documents.
#[derive(Parser, Debug)]
#[command(name = "datacube")]
#[command(author, version = env!("DATACUBE_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where and how to reach the service. Unset values fall back to the saved
/// profile.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Service base URL
    #[arg(long, env = ENV_BASE_URL, global = true)]
    pub base_url: Option<String>,

    /// API key
    #[arg(long, env = ENV_API_KEY, global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = ENV_TIMEOUT_SECS, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Database operations
    Database(DatabaseCommand),

    /// Collection operations
    Collection(CollectionCommand),

    /// Document operations
    Document(DocumentCommand),

    /// Manage the saved connection profile
    Config(ConfigCommand),
}
