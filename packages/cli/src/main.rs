mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{edit, init, list, new, show, EditArgs, InitArgs, NewArgs, ShowArgs};
use tracing_subscriber::EnvFilter;

/// Journal CLI - write and manage journal posts
#[derive(Parser, Debug)]
#[command(name = "journal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a journal.config.json in the current directory
    Init(InitArgs),

    /// List posts, most recently updated first
    List,

    /// Create an empty post
    New(NewArgs),

    /// Print a post as plain text
    Show(ShowArgs),

    /// Edit a post and save it
    Edit(EditArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match std::env::current_dir() {
        Ok(cwd) => match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::List => list(&cwd).await,
            Command::New(args) => new(args, &cwd).await,
            Command::Show(args) => show(args, &cwd).await,
            Command::Edit(args) => edit(args, &cwd).await,
        },
        Err(e) => Err(anyhow::anyhow!("Cannot get current directory: {}", e)),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
