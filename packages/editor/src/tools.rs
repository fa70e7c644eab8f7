//! # Tool Loading
//!
//! The tool set is fetched asynchronously before a surface can accept
//! input. Loaders hand back a fixed `ToolRegistry`; the session shares one
//! in-flight load between every `attach` call for the same document.

use crate::errors::MountError;
use async_trait::async_trait;
use journal_blocks::ToolRegistry;

#[async_trait]
pub trait ToolLoader: Send + Sync {
    async fn load(&self) -> Result<ToolRegistry, MountError>;
}

/// Resolves to the built-in journal tools
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTools;

#[async_trait]
impl ToolLoader for BuiltinTools {
    async fn load(&self) -> Result<ToolRegistry, MountError> {
        Ok(ToolRegistry::builtin())
    }
}
