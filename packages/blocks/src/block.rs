//! # Blocks
//!
//! One variant per registered block kind, plus an opaque variant for kinds
//! this build does not know about.
//!
//! ## Durability rules
//!
//! - Unknown `type` tags are kept as `BlockData::Unknown` with their raw
//!   `data`, so a document passes through an editor without every tool
//!   registered and comes back unchanged.
//! - Fields inside a known kind's `data` that we don't model land in
//!   `extra` and are written back on serialization.
//! - `id` and `tunes` are carried through untouched.
//! - An optional field sent as explicit `null` is written back as `null`,
//!   and one that was absent stays absent.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Block kinds with a typed data shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    Header,
    Paragraph,
    List,
    Table,
    Code,
    Embed,
    LinkTool,
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Header,
        BlockKind::Paragraph,
        BlockKind::List,
        BlockKind::Table,
        BlockKind::Code,
        BlockKind::Embed,
        BlockKind::LinkTool,
    ];

    /// Wire tag used in the `type` field
    pub fn tag(self) -> &'static str {
        match self {
            BlockKind::Header => "header",
            BlockKind::Paragraph => "paragraph",
            BlockKind::List => "list",
            BlockKind::Table => "table",
            BlockKind::Code => "code",
            BlockKind::Embed => "embed",
            BlockKind::LinkTool => "linkTool",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

// Absent stays `None`, an explicit `null` becomes `Some(Value::Null)`
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

// Absent stays `None`, an explicit `null` becomes `Some(None)`
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderData {
    pub text: String,
    pub level: u8,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphData {
    pub text: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    Unordered,
}

/// List entry: either a bare string or a nested item with children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    Text(String),
    Nested(NestedItem),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedItem {
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ListItem>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ListItem {
    pub fn content(&self) -> &str {
        match self {
            ListItem::Text(text) => text,
            ListItem::Nested(item) => &item.content,
        }
    }

    pub fn children(&self) -> &[ListItem] {
        match self {
            ListItem::Nested(NestedItem { items: Some(items), .. }) => items,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListData {
    pub style: ListStyle,
    pub items: Vec<ListItem>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    /// `Some(None)` is an explicit `null` on the wire
    #[serde(
        rename = "withHeadings",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub with_headings: Option<Option<bool>>,

    pub content: Vec<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeData {
    pub code: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedData {
    pub service: String,
    pub source: String,
    pub embed: String,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub width: Option<Option<u32>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub height: Option<Option<u32>>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub caption: Option<Option<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkToolData {
    pub link: String,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Kind-specific payload of a block
#[derive(Debug, Clone, PartialEq)]
pub enum BlockData {
    Header(HeaderData),
    Paragraph(ParagraphData),
    List(ListData),
    Table(TableData),
    Code(CodeData),
    Embed(EmbedData),
    LinkTool(LinkToolData),

    /// Kind without a registered shape, passed through verbatim
    ///
    /// `data` is `None` when the block had no `data` field at all.
    Unknown { kind: String, data: Option<Value> },
}

impl BlockData {
    pub fn kind(&self) -> Option<BlockKind> {
        Some(match self {
            BlockData::Header(_) => BlockKind::Header,
            BlockData::Paragraph(_) => BlockKind::Paragraph,
            BlockData::List(_) => BlockKind::List,
            BlockData::Table(_) => BlockKind::Table,
            BlockData::Code(_) => BlockKind::Code,
            BlockData::Embed(_) => BlockKind::Embed,
            BlockData::LinkTool(_) => BlockKind::LinkTool,
            BlockData::Unknown { .. } => return None,
        })
    }

    pub fn tag(&self) -> &str {
        match self {
            BlockData::Unknown { kind, .. } => kind,
            other => other.kind().map(BlockKind::tag).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BlockError {
    #[error("{0}")]
    Shape(#[from] serde_json::Error),

    #[error("field `{field}` must be {expected}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
    },
}

/// Block as it sits on the wire, before its `data` is typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub tunes: Option<Value>,
}

/// Single content block
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: Option<String>,
    pub data: BlockData,
    pub tunes: Option<Value>,
}

impl Block {
    pub fn new(data: BlockData) -> Self {
        Self {
            id: None,
            data,
            tunes: None,
        }
    }

    pub fn header(text: impl Into<String>, level: u8) -> Self {
        Self::new(BlockData::Header(HeaderData {
            text: text.into(),
            level,
            extra: Map::new(),
        }))
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockData::Paragraph(ParagraphData {
            text: text.into(),
            extra: Map::new(),
        }))
    }

    pub fn list(style: ListStyle, items: impl IntoIterator<Item = String>) -> Self {
        Self::new(BlockData::List(ListData {
            style,
            items: items.into_iter().map(ListItem::Text).collect(),
            extra: Map::new(),
        }))
    }

    pub fn code(code: impl Into<String>) -> Self {
        Self::new(BlockData::Code(CodeData {
            code: code.into(),
            extra: Map::new(),
        }))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn kind(&self) -> Option<BlockKind> {
        self.data.kind()
    }

    pub fn tag(&self) -> &str {
        self.data.tag()
    }

    /// Type a raw block's `data` according to its tag
    pub fn from_raw(raw: RawBlock) -> Result<Self, BlockError> {
        let RawBlock {
            id,
            kind,
            data,
            tunes,
        } = raw;

        let data = match BlockKind::from_tag(&kind) {
            None => BlockData::Unknown { kind, data },
            Some(known) => known.parse(data.unwrap_or(Value::Null))?,
        };

        Ok(Self { id, data, tunes })
    }
}

impl BlockKind {
    fn parse(self, data: Value) -> Result<BlockData, BlockError> {
        Ok(match self {
            BlockKind::Header => {
                let header: HeaderData = serde_json::from_value(data)?;
                if !(1..=6).contains(&header.level) {
                    return Err(BlockError::OutOfRange {
                        field: "level",
                        expected: "an integer between 1 and 6",
                    });
                }
                BlockData::Header(header)
            }
            BlockKind::Paragraph => BlockData::Paragraph(serde_json::from_value(data)?),
            BlockKind::List => BlockData::List(serde_json::from_value(data)?),
            BlockKind::Table => BlockData::Table(serde_json::from_value(data)?),
            BlockKind::Code => BlockData::Code(serde_json::from_value(data)?),
            BlockKind::Embed => BlockData::Embed(serde_json::from_value(data)?),
            BlockKind::LinkTool => BlockData::LinkTool(serde_json::from_value(data)?),
        })
    }
}

impl TryFrom<RawBlock> for Block {
    type Error = BlockError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        Block::from_raw(raw)
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        map.serialize_entry("type", self.tag())?;
        match &self.data {
            BlockData::Header(data) => map.serialize_entry("data", data)?,
            BlockData::Paragraph(data) => map.serialize_entry("data", data)?,
            BlockData::List(data) => map.serialize_entry("data", data)?,
            BlockData::Table(data) => map.serialize_entry("data", data)?,
            BlockData::Code(data) => map.serialize_entry("data", data)?,
            BlockData::Embed(data) => map.serialize_entry("data", data)?,
            BlockData::LinkTool(data) => map.serialize_entry("data", data)?,
            BlockData::Unknown { data: Some(data), .. } => map.serialize_entry("data", data)?,
            BlockData::Unknown { data: None, .. } => {}
        }
        if let Some(tunes) = &self.tunes {
            map.serialize_entry("tunes", tunes)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_round_trip() {
        let value = json!({
            "id": "h1",
            "type": "header",
            "data": { "text": "Day 1", "level": 2 }
        });

        let block: Block = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(block.kind(), Some(BlockKind::Header));
        match &block.data {
            BlockData::Header(header) => {
                assert_eq!(header.text, "Day 1");
                assert_eq!(header.level, 2);
            }
            other => panic!("Expected header, got {:?}", other),
        }

        assert_eq!(serde_json::to_value(&block).unwrap(), value);
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let value = json!({
            "type": "checklist",
            "data": { "items": [{ "text": "milk", "checked": true }] },
            "tunes": { "alignment": "left" }
        });

        let block: Block = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(block.kind(), None);
        assert_eq!(block.tag(), "checklist");
        assert_eq!(serde_json::to_value(&block).unwrap(), value);
    }

    #[test]
    fn test_extra_fields_survive() {
        let value = json!({
            "type": "paragraph",
            "data": { "text": "hello <code class=\"inline-code\">x</code>", "alignment": "center" }
        });

        let block: Block = serde_json::from_value(value.clone()).unwrap();
        if let BlockData::Paragraph(paragraph) = &block.data {
            assert_eq!(paragraph.extra.get("alignment"), Some(&json!("center")));
        } else {
            panic!("Expected paragraph");
        }
        assert_eq!(serde_json::to_value(&block).unwrap(), value);
    }

    #[test]
    fn test_nested_list_items() {
        let value = json!({
            "type": "list",
            "data": {
                "style": "ordered",
                "items": [
                    "plain",
                    { "content": "parent", "items": [ { "content": "child", "items": [] } ] }
                ]
            }
        });

        let block: Block = serde_json::from_value(value.clone()).unwrap();
        let BlockData::List(list) = &block.data else {
            panic!("Expected list");
        };
        assert_eq!(list.style, ListStyle::Ordered);
        assert_eq!(list.items[0].content(), "plain");
        assert_eq!(list.items[1].children()[0].content(), "child");
        assert_eq!(serde_json::to_value(&block).unwrap(), value);
    }

    #[test]
    fn test_explicit_nulls_and_nested_extras_survive() {
        let blocks = json!([
            {
                "type": "list",
                "data": {
                    "style": "unordered",
                    "items": [
                        { "content": "a", "items": [], "checked": true, "meta": null }
                    ]
                }
            },
            { "type": "linkTool", "data": { "link": "https://example.com", "meta": null } },
            { "type": "table", "data": { "withHeadings": null, "content": [["x"]] } },
            {
                "type": "embed",
                "data": {
                    "service": "youtube",
                    "source": "https://youtu.be/x",
                    "embed": "https://youtube.com/embed/x",
                    "caption": null
                }
            },
            { "type": "spoiler" },
            { "type": "spoiler", "data": null, "tunes": null }
        ]);

        let parsed: Vec<Block> = serde_json::from_value(blocks.clone()).unwrap();
        assert_eq!(serde_json::to_value(&parsed).unwrap(), blocks);

        let BlockData::List(list) = &parsed[0].data else {
            panic!("Expected list");
        };
        let ListItem::Nested(item) = &list.items[0] else {
            panic!("Expected nested item");
        };
        assert_eq!(item.extra.get("checked"), Some(&json!(true)));
        assert_eq!(item.meta, Some(Value::Null));

        assert_eq!(
            parsed[4].data,
            BlockData::Unknown {
                kind: "spoiler".to_string(),
                data: None
            }
        );
    }

    #[test]
    fn test_header_level_out_of_range() {
        let raw = RawBlock {
            id: None,
            kind: "header".to_string(),
            data: Some(json!({ "text": "Too deep", "level": 9 })),
            tunes: None,
        };

        let err = Block::from_raw(raw).unwrap_err();
        assert!(matches!(err, BlockError::OutOfRange { field: "level", .. }));
    }

    #[test]
    fn test_wrong_data_shape() {
        let raw = RawBlock {
            id: None,
            kind: "table".to_string(),
            data: Some(json!({ "content": "not rows" })),
            tunes: None,
        };

        assert!(matches!(Block::from_raw(raw), Err(BlockError::Shape(_))));
    }

    #[test]
    fn test_kind_tags() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(BlockKind::from_tag("inlineCode"), None);
    }
}
