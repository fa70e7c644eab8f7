use chrono::Utc;
use journal_schema::{validate_patch, PostRecord, PostSummary, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Post not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub const DEFAULT_TITLE: &str = "Untitled Post";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePost {
    #[serde(default)]
    pub title: Option<String>,
}

// Post store, optionally mirrored to a JSON snapshot file
pub struct PostState {
    posts: HashMap<String, PostRecord>,
    snapshot: Option<PathBuf>,
}

impl PostState {
    pub fn new() -> Self {
        Self {
            posts: HashMap::new(),
            snapshot: None,
        }
    }

    // Load from `path` if it exists; every later write goes back to it
    pub fn with_snapshot(path: impl Into<PathBuf>) -> Result<Self, StateError> {
        let path = path.into();
        let posts = if path.exists() {
            let records: Vec<PostRecord> = serde_json::from_slice(&std::fs::read(&path)?)?;
            records.into_iter().map(|r| (r.id.clone(), r)).collect()
        } else {
            HashMap::new()
        };

        tracing::info!("Loaded {} posts from {}", posts.len(), path.display());
        Ok(Self {
            posts,
            snapshot: Some(path),
        })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }

    // Most recently updated first
    pub fn list(&self) -> Vec<PostSummary> {
        let mut records: Vec<&PostRecord> = self.posts.values().collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        records.into_iter().map(PostSummary::from).collect()
    }

    pub fn get(&self, id: &str) -> Result<&PostRecord, StateError> {
        self.posts
            .get(id)
            .ok_or_else(|| StateError::NotFound(id.to_string()))
    }

    pub fn create(&mut self, request: CreatePost) -> Result<PostRecord, StateError> {
        let now = Utc::now();
        let title = request
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let mut record = PostRecord::new(uuid::Uuid::new_v4().to_string(), title);
        record.created_at = Some(now);
        record.updated_at = Some(now);

        self.posts.insert(record.id.clone(), record.clone());
        if let Err(error) = self.persist() {
            self.posts.remove(&record.id);
            return Err(error);
        }
        Ok(record)
    }

    // Apply a raw PATCH body; `published` is never touched here
    pub fn update(&mut self, id: &str, body: &Value) -> Result<PostRecord, StateError> {
        let patch = validate_patch(body)?;
        let content = serde_json::to_value(&patch.content)?;
        let record = self
            .posts
            .get_mut(id)
            .ok_or_else(|| StateError::NotFound(id.to_string()))?;

        let previous = record.clone();
        record.title = patch.title;
        record.content = content;
        record.updated_at = Some(Utc::now());

        let updated = record.clone();
        if let Err(error) = self.persist() {
            self.posts.insert(previous.id.clone(), previous);
            return Err(error);
        }
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), StateError> {
        let removed = self
            .posts
            .remove(id)
            .ok_or_else(|| StateError::NotFound(id.to_string()))?;

        if let Err(error) = self.persist() {
            self.posts.insert(removed.id.clone(), removed);
            return Err(error);
        }
        Ok(())
    }

    // Callers roll the map back when this fails, so memory never runs ahead
    // of the snapshot. The file is replaced by rename, never truncated.
    fn persist(&self) -> Result<(), StateError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };

        let mut records: Vec<&PostRecord> = self.posts.values().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        let bytes = serde_json::to_vec_pretty(&records)?;

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| StateError::Io(e.error))?;
        Ok(())
    }
}

impl Default for PostState {
    fn default() -> Self {
        Self::new()
    }
}
