use anyhow::Context;
use clap::Parser;
use journal_server::{router, AppState, PostState};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "journal-server")]
#[command(about = "Serve journal posts over HTTP", long_about = None)]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3030)]
    port: u16,

    /// Interface to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// JSON file to load posts from and write them back to
    #[arg(long)]
    data_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let posts = match &args.data_file {
        Some(path) => PostState::with_snapshot(path)
            .with_context(|| format!("Failed to load posts from {}", path.display()))?,
        None => PostState::new(),
    };

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Journal server listening on http://{}", addr);
    axum::serve(listener, router(AppState::new(posts))).await?;

    Ok(())
}
