//! # Journal Editor
//!
//! Client-side editing lifecycle for journal posts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ store: PostRecord from the system of record │
//! └─────────────────────────────────────────────┘
//!                     ↓ validate_seed
//! ┌─────────────────────────────────────────────┐
//! │ session: attach / edit / serialize / detach │
//! │  - async tool load, shared while in flight  │
//! │  - stale loads ignored after detach         │
//! │  - one surface per holder                   │
//! └─────────────────────────────────────────────┘
//!                     ↓ serialize + validate_patch
//! ┌─────────────────────────────────────────────┐
//! │ pipeline: submit update, notify, refresh    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use journal_editor::{EditorConfig, EditorSession, HttpPostStore, PostStore, SavePipeline, TracingSink};
//!
//! let store = HttpPostStore::new("http://127.0.0.1:3030", Duration::from_secs(10))?;
//! let record = store.fetch("post-id").await?;
//!
//! let session = EditorSession::with_builtin_tools(EditorConfig::default());
//! session.attach_record(&record).await?;
//! session.edit(|surface| surface.push(Block::paragraph("Went for a walk.")))??;
//!
//! let pipeline = SavePipeline::new(store, TracingSink, || println!("stale"));
//! pipeline.save(&record.id, &session.current_title(), &session).await?;
//! ```

mod config;
mod errors;
mod notify;
mod pipeline;
mod session;
mod store;
mod surface;
mod tools;

pub use config::EditorConfig;
pub use errors::{EditorError, MountError, NotReadyError};
pub use notify::{Notification, NotificationSink, TracingSink, Variant, ViewRefresher};
pub use pipeline::SavePipeline;
pub use session::{EditorSession, SessionStatus};
pub use store::{HttpPostStore, PostStore, StoreError};
pub use surface::{HolderClaim, HolderRegistry, Surface, SurfaceError};
pub use tools::{BuiltinTools, ToolLoader};

// Re-export common types for convenience
pub use journal_blocks::{Block, BlockData, ContentDocument, ToolRegistry};
pub use journal_schema::{PostPatch, PostRecord, PostSummary, ValidationError};
