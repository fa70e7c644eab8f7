//! # Editing Surface
//!
//! The live, mutable block list a session edits, bound to a holder id.
//!
//! A holder can be owned by one surface at a time. Ownership is a
//! `HolderClaim` that gives the id back when dropped, so tearing a surface
//! down (from any session state) always frees its holder.

use crate::config::EditorConfig;
use crate::errors::MountError;
use journal_blocks::{Block, ContentDocument, ToolRegistry};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Block index {index} out of bounds (surface has {len} blocks)")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("No tool registered for `{0}` blocks")]
    NoTool(String),
}

/// Tracks which holder ids are owned by a live surface
#[derive(Debug, Clone, Default)]
pub struct HolderRegistry {
    held: Arc<Mutex<HashSet<String>>>,
}

impl HolderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&self, holder: &str) -> Result<HolderClaim, MountError> {
        let mut held = lock(&self.held);
        if !held.insert(holder.to_string()) {
            return Err(MountError::HolderBusy(holder.to_string()));
        }

        Ok(HolderClaim {
            holder: holder.to_string(),
            held: Arc::clone(&self.held),
        })
    }

    pub fn is_held(&self, holder: &str) -> bool {
        lock(&self.held).contains(holder)
    }

    pub fn held_count(&self) -> usize {
        lock(&self.held).len()
    }
}

/// Exclusive ownership of a holder id
#[derive(Debug)]
pub struct HolderClaim {
    holder: String,
    held: Arc<Mutex<HashSet<String>>>,
}

impl HolderClaim {
    pub fn holder(&self) -> &str {
        &self.holder
    }
}

impl Drop for HolderClaim {
    fn drop(&mut self) {
        lock(&self.held).remove(&self.holder);
        tracing::debug!(holder = %self.holder, "released editor holder");
    }
}

fn lock(held: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    held.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Live editing surface
#[derive(Debug)]
pub struct Surface {
    claim: HolderClaim,
    tools: Arc<ToolRegistry>,
    placeholder: String,
    inline_toolbar: bool,
    blocks: Vec<Block>,
}

impl Surface {
    pub(crate) fn new(
        claim: HolderClaim,
        tools: Arc<ToolRegistry>,
        seed: ContentDocument,
        config: &EditorConfig,
    ) -> Self {
        for block in seed.blocks.iter().filter(|b| !tools.handles(b)) {
            // Kept as-is; the surface just can't edit it
            tracing::warn!(kind = block.tag(), "no tool for block kind, preserving it verbatim");
        }

        Self {
            claim,
            tools,
            placeholder: config.placeholder.clone(),
            inline_toolbar: config.inline_toolbar,
            blocks: seed.blocks,
        }
    }

    pub fn holder(&self) -> &str {
        self.claim.holder()
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn inline_toolbar(&self) -> bool {
        self.inline_toolbar
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn push(&mut self, block: Block) -> Result<(), SurfaceError> {
        self.check_tool(&block)?;
        self.blocks.push(block);
        Ok(())
    }

    pub fn insert(&mut self, index: usize, block: Block) -> Result<(), SurfaceError> {
        self.check_tool(&block)?;
        if index > self.blocks.len() {
            return Err(self.out_of_bounds(index));
        }
        self.blocks.insert(index, block);
        Ok(())
    }

    /// Swap the block at `index`, returning the old one
    pub fn replace(&mut self, index: usize, block: Block) -> Result<Block, SurfaceError> {
        self.check_tool(&block)?;
        let len = self.blocks.len();
        let slot = self
            .blocks
            .get_mut(index)
            .ok_or(SurfaceError::IndexOutOfBounds { index, len })?;
        Ok(std::mem::replace(slot, block))
    }

    pub fn remove(&mut self, index: usize) -> Result<Block, SurfaceError> {
        if index >= self.blocks.len() {
            return Err(self.out_of_bounds(index));
        }
        Ok(self.blocks.remove(index))
    }

    pub fn move_block(&mut self, from: usize, to: usize) -> Result<(), SurfaceError> {
        if from >= self.blocks.len() {
            return Err(self.out_of_bounds(from));
        }
        if to >= self.blocks.len() {
            return Err(self.out_of_bounds(to));
        }
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        Ok(())
    }

    /// Current blocks with a fresh timestamp
    pub(crate) fn snapshot(&self) -> ContentDocument {
        ContentDocument::stamped(self.blocks.clone())
    }

    fn check_tool(&self, block: &Block) -> Result<(), SurfaceError> {
        if self.tools.handles(block) {
            Ok(())
        } else {
            Err(SurfaceError::NoTool(block.tag().to_string()))
        }
    }

    fn out_of_bounds(&self, index: usize) -> SurfaceError {
        SurfaceError::IndexOutOfBounds {
            index,
            len: self.blocks.len(),
        }
    }
}
