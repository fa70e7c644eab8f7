//! Error types for the editor

use crate::session::SessionStatus;
use crate::store::StoreError;
use crate::surface::SurfaceError;
use journal_schema::ValidationError;
use thiserror::Error;

/// Failure to bring an editing surface up
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MountError {
    #[error("Tool set failed to load: {0}")]
    ToolLoad(String),

    #[error("Seed rejected: {0}")]
    Seed(#[from] ValidationError),

    #[error("Holder `{0}` is already owned by another session")]
    HolderBusy(String),

    #[error("Mount of `{0}` was cancelled")]
    Cancelled(String),
}

impl MountError {
    /// Short machine-readable kind for hosts that only show a category
    pub fn kind(&self) -> &'static str {
        match self {
            MountError::ToolLoad(_) => "tool_load",
            MountError::Seed(_) => "seed",
            MountError::HolderBusy(_) => "holder_busy",
            MountError::Cancelled(_) => "cancelled",
        }
    }
}

/// Operation attempted while the session couldn't serve it
///
/// This is a caller bug (e.g. serializing before the surface is up), not
/// a user-facing condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{operation}` needs a ready editor, session is {status}")]
pub struct NotReadyError {
    pub operation: &'static str,
    pub status: SessionStatus,
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Mount(#[from] MountError),

    #[error(transparent)]
    NotReady(#[from] NotReadyError),

    #[error("Save failed: {0}")]
    Save(#[from] StoreError),

    #[error(transparent)]
    Edit(#[from] SurfaceError),

    #[error("Session is attached to `{attached}`, not `{requested}`")]
    DocumentMismatch { requested: String, attached: String },
}
