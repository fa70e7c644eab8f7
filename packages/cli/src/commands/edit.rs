use super::connect;
use super::show::print_post;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use journal_editor::{
    Block, EditorSession, Notification, NotificationSink, PostStore, SavePipeline, SurfaceError,
    Variant,
};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Post id
    pub id: String,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Append a paragraph (repeatable)
    #[arg(short, long = "paragraph")]
    pub paragraphs: Vec<String>,

    /// Append a header
    #[arg(long)]
    pub header: Option<String>,

    /// Header level
    #[arg(long, default_value_t = 2, requires = "header", value_parser = clap::value_parser!(u8).range(1..=6))]
    pub level: u8,

    /// Remove the block at this index before appending
    #[arg(long)]
    pub remove: Option<usize>,
}

impl EditArgs {
    fn is_noop(&self) -> bool {
        self.title.is_none()
            && self.paragraphs.is_empty()
            && self.header.is_none()
            && self.remove.is_none()
    }
}

/// Prints save outcomes as toast-style lines
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn render(notification: &Notification) -> String {
        let text = if notification.title.is_empty() {
            notification.description.clone()
        } else {
            format!("{} {}", notification.title, notification.description)
        };

        match notification.variant {
            Variant::Default => format!("{} {}", "✓".green(), text),
            Variant::Destructive => format!("{} {}", "✗".red(), text.red()),
        }
    }
}

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: Notification) {
        println!("{}", Self::render(&notification));
    }
}

pub async fn edit(args: EditArgs, cwd: &Path) -> Result<()> {
    if args.is_noop() {
        bail!("Nothing to change. Pass --title, --paragraph, --header or --remove");
    }

    let (config, store) = connect(cwd)?;
    let store = Arc::new(store);
    let record = store.fetch(&args.id).await?;

    let session = EditorSession::with_builtin_tools(config.editor.clone());
    session.attach_record(&record).await?;

    let result = apply_and_save(&args, &session, store.clone()).await;
    session.detach();
    let stale = result?;

    if stale {
        println!();
        print_post(&store.fetch(&args.id).await?)?;
    }

    Ok(())
}

// Returns whether the saved post should be re-fetched
async fn apply_and_save<S: PostStore>(
    args: &EditArgs,
    session: &EditorSession,
    store: S,
) -> Result<bool> {
    if let Some(title) = &args.title {
        session.set_title(title.clone());
    }

    session.edit(|surface| -> Result<(), SurfaceError> {
        if let Some(index) = args.remove {
            surface.remove(index)?;
        }
        if let Some(text) = &args.header {
            surface.push(Block::header(text.clone(), args.level))?;
        }
        for text in &args.paragraphs {
            surface.push(Block::paragraph(text.clone()))?;
        }
        Ok(())
    })??;

    let stale = Arc::new(AtomicBool::new(false));
    let flag = stale.clone();
    let pipeline = SavePipeline::new(store, ConsoleSink, move || flag.store(true, Ordering::SeqCst));

    pipeline
        .save(&args.id, &session.current_title(), session)
        .await?;

    Ok(stale.load(Ordering::SeqCst))
}
