//! # Journal Blocks
//!
//! Tool-agnostic content model for journal documents.
//!
//! A document body is an ordered list of typed blocks. The shapes here are
//! the wire/storage format shared by the editing surface and the
//! persistence layer; nothing in this crate renders anything.
//!
//! ```text
//! ContentDocument { time, blocks: [Block, ...], version }
//!                              │
//!                              ├─ header    { text, level }
//!                              ├─ paragraph { text }
//!                              ├─ list      { style, items }
//!                              ├─ table     { withHeadings, content }
//!                              ├─ code      { code }
//!                              ├─ embed     { service, source, embed, ... }
//!                              ├─ linkTool  { link, meta }
//!                              └─ <other>   opaque, kept as-is
//! ```

mod block;
mod document;
mod registry;

pub use block::{
    Block, BlockData, BlockError, BlockKind, CodeData, EmbedData, HeaderData, LinkToolData,
    ListData, ListItem, ListStyle, NestedItem, ParagraphData, RawBlock, TableData,
};
pub use document::{ContentDocument, EDITOR_VERSION};
pub use registry::{ToolDescriptor, ToolRegistry, ToolRole};
