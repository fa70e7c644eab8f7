use super::connect;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use journal_editor::{PostRecord, PostStore};
use journal_schema::validate_seed;
use std::path::Path;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Post id
    pub id: String,
}

pub async fn show(args: ShowArgs, cwd: &Path) -> Result<()> {
    let (_, store) = connect(cwd)?;
    let record = store.fetch(&args.id).await?;
    print_post(&record)
}

/// Title, status badge, and the body as plain text
pub(crate) fn print_post(record: &PostRecord) -> Result<()> {
    let document = validate_seed(record)?;

    let badge = if record.published {
        record.status_label().green()
    } else {
        record.status_label().yellow()
    };
    println!("{}  {}", record.title.bold(), badge);
    println!("{}", "─".repeat(40).dimmed());

    if document.is_empty() {
        println!("{}", "(empty)".dimmed());
    } else {
        println!("{}", document.plain_text());
    }

    Ok(())
}
