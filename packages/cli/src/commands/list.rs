use super::connect;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub async fn list(cwd: &Path) -> Result<()> {
    let (_, store) = connect(cwd)?;
    let posts = store.list().await?;

    if posts.is_empty() {
        println!("No posts yet. Run: journal new");
        return Ok(());
    }

    for post in posts {
        let badge = if post.published {
            "Published".green()
        } else {
            "Draft".yellow()
        };
        let updated = post
            .updated_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        println!(
            "{}  {:<10} {:<16} {}",
            post.id.dimmed(),
            badge,
            updated,
            post.title.bold()
        );
    }

    Ok(())
}
