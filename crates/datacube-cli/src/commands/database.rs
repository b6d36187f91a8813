//! Database subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use datacube_core::{CollectionSpec, DatabaseId, DocumentService};

use crate::cli::ConnectionArgs;
use crate::output;
use crate::profile;

use super::input;

#[derive(Args, Debug)]
pub struct DatabaseCommand {
    #[command(subcommand)]
    pub command: DatabaseSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum DatabaseSubcommand {
    /// Create a database with its initial collections
    Create(CreateArgs),

    /// Drop a database and all of its collections
    Drop(DropArgs),

    /// Show collection and field counts
    Metadata(MetadataArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Database name
    #[arg(long)]
    pub name: String,

    /// JSON file with the collection definitions (use - for stdin)
    #[arg(long)]
    pub collections: String,
}

#[derive(Args, Debug)]
pub struct DropArgs {
    /// Database id
    pub database_id: String,
}

#[derive(Args, Debug)]
pub struct MetadataArgs {
    /// Database id
    pub database_id: String,
}

pub async fn handle(cmd: DatabaseCommand, connection: &ConnectionArgs) -> Result<()> {
    match cmd.command {
        DatabaseSubcommand::Create(args) => create(args, connection).await,
        DatabaseSubcommand::Drop(args) => drop(args, connection).await,
        DatabaseSubcommand::Metadata(args) => metadata(args, connection).await,
    }
}

async fn create(args: CreateArgs, connection: &ConnectionArgs) -> Result<()> {
    let collections: Vec<CollectionSpec> = input::read_json(&args.collections)?;

    let service = profile::connect(connection)?;
    let database = service
        .create_database(&args.name, &collections)
        .await
        .context("Failed to create database")?;

    output::json(&database)?;
    output::success(&format!("Created database {}", database.id));

    Ok(())
}

async fn drop(args: DropArgs, connection: &ConnectionArgs) -> Result<()> {
    let database_id = DatabaseId::new(&args.database_id).context("Invalid database id")?;

    let service = profile::connect(connection)?;
    let confirmation = service
        .drop_database(&database_id)
        .await
        .context("Failed to drop database")?;

    output::success(
        confirmation
            .message
            .as_deref()
            .unwrap_or("Database dropped"),
    );

    Ok(())
}

async fn metadata(args: MetadataArgs, connection: &ConnectionArgs) -> Result<()> {
    let database_id = DatabaseId::new(&args.database_id).context("Invalid database id")?;

    let service = profile::connect(connection)?;
    let metadata = service
        .get_metadata(&database_id)
        .await
        .context("Failed to fetch database metadata")?;

    output::json(&metadata)?;
    output::field("Collections", &metadata.total_collections.to_string());
    output::field("Fields", &metadata.total_fields.to_string());

    Ok(())
}
