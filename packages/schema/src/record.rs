use crate::error::{ValidationError, ValidationResult};
use crate::validate::validate_patch;
use chrono::{DateTime, Utc};
use journal_blocks::ContentDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Post as stored by the persistence boundary
///
/// `content` is untyped at rest; run it through [`crate::validate_seed`]
/// before handing it to an editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub content: Value,

    #[serde(default)]
    pub published: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PostRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: Value::Null,
            published: false,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_content(mut self, content: Value) -> Self {
        self.content = content;
        self
    }

    pub fn status_label(&self) -> &'static str {
        if self.published {
            "Published"
        } else {
            "Draft"
        }
    }
}

/// Body of an update request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPatch {
    pub title: String,
    pub content: ContentDocument,
}

impl PostPatch {
    /// Build a patch and validate its wire form
    ///
    /// The content has just come out of the editor, but it is checked again
    /// as JSON so a misbehaving tool can't push a malformed body.
    pub fn validated(title: impl Into<String>, content: ContentDocument) -> ValidationResult<Self> {
        let patch = Self {
            title: title.into(),
            content,
        };
        let wire = serde_json::to_value(&patch)
            .map_err(|e| ValidationError::new("", "a serializable payload", e.to_string()))?;
        validate_patch(&wire)
    }
}

/// Listing entry, without the body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub published: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&PostRecord> for PostSummary {
    fn from(record: &PostRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            published: record.published,
            updated_at: record.updated_at,
        }
    }
}
