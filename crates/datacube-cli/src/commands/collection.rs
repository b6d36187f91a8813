//! Collection subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use datacube_core::{CollectionName, CollectionSpec, DatabaseId, DocumentService};

use crate::cli::ConnectionArgs;
use crate::output;
use crate::profile;

use super::input;

#[derive(Args, Debug)]
pub struct CollectionCommand {
    #[command(subcommand)]
    pub command: CollectionSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CollectionSubcommand {
    /// Add collections to a database
    Create(CreateArgs),

    /// List the collections of a database
    List(ListArgs),

    /// Drop collections from a database
    Drop(DropArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Database id
    pub database_id: String,

    /// JSON file with the collection definitions (use - for stdin)
    #[arg(long)]
    pub collections: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Database id
    pub database_id: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct DropArgs {
    /// Database id
    pub database_id: String,

    /// Names of the collections to drop
    #[arg(required = true)]
    pub names: Vec<String>,
}

pub async fn handle(cmd: CollectionCommand, connection: &ConnectionArgs) -> Result<()> {
    match cmd.command {
        CollectionSubcommand::Create(args) => create(args, connection).await,
        CollectionSubcommand::List(args) => list(args, connection).await,
        CollectionSubcommand::Drop(args) => drop(args, connection).await,
    }
}

async fn create(args: CreateArgs, connection: &ConnectionArgs) -> Result<()> {
    let database_id = DatabaseId::new(&args.database_id).context("Invalid database id")?;
    let collections: Vec<CollectionSpec> = input::read_json(&args.collections)?;

    let service = profile::connect(connection)?;
    let created = service
        .create_collection(&database_id, &collections)
        .await
        .context("Failed to create collections")?;

    for collection in &created.collections {
        output::json(collection)?;
    }
    output::success(&format!(
        "Database now has {} collection(s) and {} field(s)",
        created.total_collections, created.total_fields
    ));

    Ok(())
}

async fn list(args: ListArgs, connection: &ConnectionArgs) -> Result<()> {
    let database_id = DatabaseId::new(&args.database_id).context("Invalid database id")?;

    let service = profile::connect(connection)?;
    let collections = service
        .list_collections(&database_id)
        .await
        .context("Failed to list collections")?;

    if collections.is_empty() {
        output::note("No collections found.");
        return Ok(());
    }

    for collection in &collections {
        output::record(collection, args.pretty)?;
    }

    Ok(())
}

async fn drop(args: DropArgs, connection: &ConnectionArgs) -> Result<()> {
    let database_id = DatabaseId::new(&args.database_id).context("Invalid database id")?;
    let names = args
        .names
        .iter()
        .map(|name| CollectionName::new(name.as_str()))
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid collection name")?;

    let service = profile::connect(connection)?;
    let confirmation = service
        .drop_collections(&database_id, &names)
        .await
        .context("Failed to drop collections")?;

    output::success(
        confirmation
            .message
            .as_deref()
            .unwrap_or("Collections dropped"),
    );

    Ok(())
}
