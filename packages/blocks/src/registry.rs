//! # Tool Registry
//!
//! Static mapping from block tag to the tool that handles it. The set is
//! fixed when a session is built; adding a kind means adding a `BlockKind`
//! variant, not registering something at runtime.

use crate::block::{Block, BlockKind};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRole {
    /// Produces whole blocks
    Block,
    /// Formats text inside other blocks (e.g. inline code)
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    /// Name the tool is registered under
    pub name: &'static str,
    pub role: ToolRole,
    /// Block kind this tool produces, `None` for inline tools
    pub kind: Option<BlockKind>,
    pub shortcut: Option<&'static str>,
}

impl ToolDescriptor {
    pub const fn block(kind: BlockKind, name: &'static str) -> Self {
        Self {
            name,
            role: ToolRole::Block,
            kind: Some(kind),
            shortcut: None,
        }
    }

    pub const fn inline(name: &'static str, shortcut: &'static str) -> Self {
        Self {
            name,
            role: ToolRole::Inline,
            kind: None,
            shortcut: Some(shortcut),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The journal tool set: header, linkTool, list, code, inlineCode, table
    /// and embed, plus the paragraph tool every editor has by default
    pub fn builtin() -> Self {
        Self::new()
            .with(ToolDescriptor::block(BlockKind::Paragraph, "paragraph"))
            .with(ToolDescriptor::block(BlockKind::Header, "header"))
            .with(ToolDescriptor::block(BlockKind::LinkTool, "linkTool"))
            .with(ToolDescriptor::block(BlockKind::List, "list"))
            .with(ToolDescriptor::block(BlockKind::Code, "code"))
            .with(ToolDescriptor::inline("inlineCode", "CMD+SHIFT+M"))
            .with(ToolDescriptor::block(BlockKind::Table, "table"))
            .with(ToolDescriptor::block(BlockKind::Embed, "embed"))
    }

    pub fn with(mut self, tool: ToolDescriptor) -> Self {
        self.tools.insert(tool.name, tool);
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        self.tools.remove(name);
        self
    }

    /// Handler for a block tag
    pub fn resolve(&self, tag: &str) -> Option<&ToolDescriptor> {
        self.tools
            .get(tag)
            .filter(|tool| tool.role == ToolRole::Block)
    }

    /// Whether a registered tool renders this block; unhandled blocks are
    /// still kept, just not editable
    pub fn handles(&self, block: &Block) -> bool {
        block.kind().is_some() && self.resolve(block.tag()).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
