use super::connect;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Title of the post (defaults to "Untitled Post")
    #[arg(short, long)]
    pub title: Option<String>,
}

pub async fn new(args: NewArgs, cwd: &Path) -> Result<()> {
    let (_, store) = connect(cwd)?;
    let record = store.create(args.title.as_deref()).await?;

    println!("{} Created {}", "✓".green(), record.title.bold());
    println!("  id: {}", record.id);
    println!();
    println!("Next: journal edit {} --paragraph \"...\"", record.id);

    Ok(())
}
