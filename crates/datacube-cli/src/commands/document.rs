//! Document subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use futures_util::{StreamExt, pin_mut};
use serde_json::Value;

use datacube_core::{
    CollectionName, DEFAULT_PAGE_SIZE, DatabaseId, DocumentId, DocumentService, ReadOptions,
};

use crate::cli::ConnectionArgs;
use crate::output;
use crate::profile;

use super::input;

#[derive(Args, Debug)]
pub struct DocumentCommand {
    #[command(subcommand)]
    pub command: DocumentSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum DocumentSubcommand {
    /// Insert one document (a JSON object) or several (a JSON array)
    Create(CreateArgs),

    /// Read documents, one page or all of them
    Read(ReadArgs),

    /// Apply a partial update to a document
    Update(UpdateArgs),

    /// Soft-delete a document
    Delete(DeleteArgs),
}

/// Database id and collection name shared by every document subcommand.
#[derive(Args, Debug)]
pub struct Target {
    /// Database id
    pub database_id: String,

    /// Collection name
    pub collection: String,
}

impl Target {
    fn parse(&self) -> Result<(DatabaseId, CollectionName)> {
        let database_id = DatabaseId::new(&self.database_id).context("Invalid database id")?;
        let collection =
            CollectionName::new(self.collection.as_str()).context("Invalid collection name")?;
        Ok((database_id, collection))
    }
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub target: Target,

    /// JSON file with the document(s) (use - for stdin)
    #[arg(long)]
    pub json: String,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    #[command(flatten)]
    pub target: Target,

    /// Page to read (1-based)
    #[arg(long, default_value_t = 1, conflicts_with = "all")]
    pub page: u32,

    /// Records per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Filter as a JSON object, e.g. '{"status":"active"}'
    #[arg(long)]
    pub filter: Option<String>,

    /// Follow pagination until every record is fetched
    #[arg(long)]
    pub all: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub target: Target,

    /// Document id
    pub document_id: String,

    /// JSON file with the fields to change (use - for stdin)
    #[arg(long)]
    pub json: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: Target,

    /// Document id
    pub document_id: String,
}

pub async fn handle(cmd: DocumentCommand, connection: &ConnectionArgs) -> Result<()> {
    match cmd.command {
        DocumentSubcommand::Create(args) => create(args, connection).await,
        DocumentSubcommand::Read(args) => read(args, connection).await,
        DocumentSubcommand::Update(args) => update(args, connection).await,
        DocumentSubcommand::Delete(args) => delete(args, connection).await,
    }
}

async fn create(args: CreateArgs, connection: &ConnectionArgs) -> Result<()> {
    let (database_id, collection) = args.target.parse()?;
    let payload: Value = input::read_json(&args.json)?;

    let service = profile::connect(connection)?;
    let inserted = match &payload {
        Value::Array(documents) => service
            .create_documents(&database_id, &collection, documents)
            .await
            .context("Failed to create documents")?,
        document => service
            .create_document(&database_id, &collection, document)
            .await
            .context("Failed to create document")?,
    };

    for id in &inserted.inserted_ids {
        println!("{}", id);
    }
    output::success(&format!(
        "Inserted {} document(s) into {}",
        inserted.inserted_ids.len(),
        collection
    ));

    Ok(())
}

async fn read(args: ReadArgs, connection: &ConnectionArgs) -> Result<()> {
    let (database_id, collection) = args.target.parse()?;
    let filter = args
        .filter
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("Invalid filter JSON")?;

    let service = profile::connect(connection)?;

    if args.all {
        let mut paginator = service
            .paginate(database_id, collection)
            .page_size(args.page_size.unwrap_or(DEFAULT_PAGE_SIZE));
        if let Some(filter) = filter {
            paginator = paginator.filter(filter);
        }

        let pages = paginator.pages();
        pin_mut!(pages);

        let mut fetched = 0u32;
        let mut records = 0usize;
        while let Some(page) = pages.next().await {
            let page = match page {
                Ok(page) => page,
                Err(e) => {
                    output::error(&format!(
                        "Stopped after {} page(s), {} record(s)",
                        fetched, records
                    ));
                    return Err(e).context("Failed to read documents");
                }
            };
            fetched += 1;
            records += page.data.len();
            for document in &page.data {
                output::record(document, args.pretty)?;
            }
        }

        output::note(&format!("{} record(s) in {} page(s)", records, fetched));
        return Ok(());
    }

    let mut options = ReadOptions::new().page(args.page);
    if let Some(page_size) = args.page_size {
        options = options.page_size(page_size);
    }
    if let Some(filter) = filter {
        options = options.filter(filter);
    }

    let page = service
        .read_documents(&database_id, &collection, &options)
        .await
        .context("Failed to read documents")?;

    if page.data.is_empty() {
        output::note("No documents found.");
    }
    for document in &page.data {
        output::record(document, args.pretty)?;
    }

    let pagination = page.pagination;
    output::note(&format!(
        "Page {} of {} ({} record(s) total)",
        pagination.current_page,
        pagination.total_pages(),
        pagination.total_records
    ));
    if pagination.has_more() {
        output::field("Next page", &(pagination.current_page + 1).to_string());
    }

    Ok(())
}

async fn update(args: UpdateArgs, connection: &ConnectionArgs) -> Result<()> {
    let (database_id, collection) = args.target.parse()?;
    let document_id = DocumentId::new(&args.document_id).context("Invalid document id")?;
    let changes: Value = input::read_json(&args.json)?;

    let service = profile::connect(connection)?;
    let confirmation = service
        .update_document(&database_id, &collection, &document_id, &changes)
        .await
        .context("Failed to update document")?;

    output::success(
        confirmation
            .message
            .as_deref()
            .unwrap_or("Document updated"),
    );

    Ok(())
}

async fn delete(args: DeleteArgs, connection: &ConnectionArgs) -> Result<()> {
    let (database_id, collection) = args.target.parse()?;
    let document_id = DocumentId::new(&args.document_id).context("Invalid document id")?;

    let service = profile::connect(connection)?;
    let confirmation = service
        .delete_document(&database_id, &collection, &document_id)
        .await
        .context("Failed to delete document")?;

    output::success(
        confirmation
            .message
            .as_deref()
            .unwrap_or("Document deleted"),
    );

    Ok(())
}
