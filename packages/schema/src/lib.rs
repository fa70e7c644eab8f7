//! # Journal Schema
//!
//! Enforces the shape of a post's editable fields, in both directions:
//!
//! - **seed**: persisted record → typed `ContentDocument` for the editor
//! - **patch**: outgoing `{ title, content }` payload, re-checked before it
//!   goes over the wire
//!
//! Validation is a pure function of its input. Failures carry the field
//! path that broke and what was expected there; nothing is coerced.

mod error;
mod record;
mod validate;

pub use error::{ValidationError, ValidationResult};
pub use record::{PostPatch, PostRecord, PostSummary};
pub use validate::{validate_content, validate_patch, validate_seed};

pub use journal_blocks::ContentDocument;
