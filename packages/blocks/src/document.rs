//! # Content Document
//!
//! Serialized form of a document body: `{ time, blocks, version }`.
//!
//! `blocks` order is reading order and is preserved exactly. An empty
//! `blocks` list is a valid (empty) document. `time` and `version` are
//! stamped on every serialization; seeds coming from storage may lack them.

use crate::block::{Block, BlockData, ListItem, ListStyle};
use serde::{Deserialize, Serialize};

/// Format version written on every serialization
pub const EDITOR_VERSION: &str = "2.26.5";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDocument {
    /// Milliseconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,

    pub blocks: Vec<Block>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ContentDocument {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            time: None,
            blocks,
            version: None,
        }
    }

    /// Snapshot `blocks` with a fresh timestamp and the current format version
    pub fn stamped(blocks: Vec<Block>) -> Self {
        Self {
            time: Some(chrono::Utc::now().timestamp_millis()),
            blocks,
            version: Some(EDITOR_VERSION.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Reading-order plain text, one line per block (list items and table
    /// rows get a line each)
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        for block in &self.blocks {
            match &block.data {
                BlockData::Header(header) => {
                    let marks = "#".repeat(header.level as usize);
                    lines.push(format!("{} {}", marks, strip_markup(&header.text)));
                }
                BlockData::Paragraph(paragraph) => lines.push(strip_markup(&paragraph.text)),
                BlockData::List(list) => push_list_items(&mut lines, &list.items, list.style, 0),
                BlockData::Table(table) => {
                    for row in &table.content {
                        let cells: Vec<String> = row.iter().map(|c| strip_markup(c)).collect();
                        lines.push(cells.join(" | "));
                    }
                }
                BlockData::Code(code) => lines.push(code.code.clone()),
                BlockData::Embed(embed) => lines.push(format!("[{}] {}", embed.service, embed.source)),
                BlockData::LinkTool(link) => lines.push(link.link.clone()),
                BlockData::Unknown { kind, .. } => lines.push(format!("[{}]", kind)),
            }
        }
        lines.join("\n")
    }
}

fn push_list_items(lines: &mut Vec<String>, items: &[ListItem], style: ListStyle, depth: usize) {
    let indent = "  ".repeat(depth);
    for (index, item) in items.iter().enumerate() {
        let bullet = match style {
            ListStyle::Ordered => format!("{}.", index + 1),
            ListStyle::Unordered => "-".to_string(),
        };
        lines.push(format!("{}{} {}", indent, bullet, strip_markup(item.content())));
        push_list_items(lines, item.children(), style, depth + 1);
    }
}

/// Drop inline HTML tags and decode the handful of entities the editor emits
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
