//! # Validators
//!
//! Walks untyped JSON and produces typed documents, reporting the first
//! field that doesn't fit.
//!
//! ## Content rules
//!
//! - `content` is an object with a `blocks` array
//! - `time`, when present, is an integer (ms since epoch)
//! - `version`, when present, is a string
//! - every block is an object with a string `type`
//! - known kinds need an object `data` matching their shape
//! - unknown kinds keep whatever `data` they came with

use crate::error::{describe, ValidationError, ValidationResult};
use crate::record::{PostPatch, PostRecord};
use journal_blocks::{Block, BlockError, BlockKind, ContentDocument, RawBlock};
use serde_json::Value;

/// Parse a persisted record's content into a seed for the editor
///
/// A post that has never been saved has `null` content; that seeds an
/// empty document. Anything else must be a well-formed content document.
pub fn validate_seed(record: &PostRecord) -> ValidationResult<ContentDocument> {
    match &record.content {
        Value::Null => Ok(ContentDocument::empty()),
        content => validate_content(content, "content"),
    }
}

/// Validate an outgoing `{ title, content }` payload
pub fn validate_patch(input: &Value) -> ValidationResult<PostPatch> {
    let fields = input
        .as_object()
        .ok_or_else(|| ValidationError::mismatch("", "an object with `title` and `content`", input))?;

    let title = match fields.get("title") {
        Some(Value::String(title)) => title.clone(),
        Some(other) => return Err(ValidationError::mismatch("title", "a string", other)),
        None => return Err(ValidationError::missing("title", "a string")),
    };

    let content = match fields.get("content") {
        Some(content) => validate_content(content, "content")?,
        None => return Err(ValidationError::missing("content", "a content document")),
    };

    Ok(PostPatch { title, content })
}

/// Validate a content document found at `path`
pub fn validate_content(value: &Value, path: &str) -> ValidationResult<ContentDocument> {
    let fields = value
        .as_object()
        .ok_or_else(|| ValidationError::mismatch(path, "a content document object", value))?;

    let time = match fields.get("time") {
        None | Some(Value::Null) => None,
        Some(time) => Some(time.as_i64().ok_or_else(|| {
            ValidationError::mismatch(format!("{}.time", path), "an integer timestamp", time)
        })?),
    };

    let version = match fields.get("version") {
        None | Some(Value::Null) => None,
        Some(Value::String(version)) => Some(version.clone()),
        Some(other) => {
            return Err(ValidationError::mismatch(
                format!("{}.version", path),
                "a string",
                other,
            ))
        }
    };

    let blocks_path = format!("{}.blocks", path);
    let raw_blocks = match fields.get("blocks") {
        Some(Value::Array(blocks)) => blocks,
        Some(other) => {
            return Err(ValidationError::mismatch(
                blocks_path,
                "an ordered sequence of blocks",
                other,
            ))
        }
        None => return Err(ValidationError::missing(blocks_path, "an ordered sequence of blocks")),
    };

    let blocks = raw_blocks
        .iter()
        .enumerate()
        .map(|(index, block)| validate_block(block, &format!("{}[{}]", blocks_path, index)))
        .collect::<ValidationResult<Vec<_>>>()?;

    Ok(ContentDocument {
        time,
        blocks,
        version,
    })
}

fn validate_block(value: &Value, path: &str) -> ValidationResult<Block> {
    let fields = value
        .as_object()
        .ok_or_else(|| ValidationError::mismatch(path, "a block object", value))?;

    let kind = match fields.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        Some(other) => return Err(ValidationError::mismatch(format!("{}.type", path), "a string", other)),
        None => return Err(ValidationError::missing(format!("{}.type", path), "a block type")),
    };

    let id = match fields.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(other) => return Err(ValidationError::mismatch(format!("{}.id", path), "a string", other)),
    };

    let tunes = match fields.get("tunes") {
        None => None,
        Some(tunes @ (Value::Null | Value::Object(_))) => Some(tunes.clone()),
        Some(other) => {
            return Err(ValidationError::mismatch(format!("{}.tunes", path), "an object", other))
        }
    };

    let data_path = format!("{}.data", path);
    let data = fields.get("data").cloned();
    if let Some(known) = BlockKind::from_tag(&kind) {
        if !data.as_ref().is_some_and(Value::is_object) {
            return Err(ValidationError::new(
                data_path,
                format!("{} data object", known.tag()),
                data.as_ref().map(describe).unwrap_or_else(|| "nothing".to_string()),
            ));
        }
    }

    let raw = RawBlock {
        id,
        kind,
        data: data.clone(),
        tunes,
    };

    Block::from_raw(raw).map_err(|e| match e {
        BlockError::Shape(err) => ValidationError::new(data_path, "valid block data", err.to_string()),
        BlockError::OutOfRange { field, expected } => {
            let found = data
                .as_ref()
                .and_then(|d| d.get(field))
                .map(describe)
                .unwrap_or_else(|| "nothing".to_string());
            ValidationError::new(format!("{}.{}", data_path, field), expected, found)
        }
    })
}
