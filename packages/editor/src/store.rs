//! # Persistence Boundary
//!
//! The system of record for posts. The editor only ever holds a working
//! copy; `PostStore` is how it reads seeds and submits updates.

use async_trait::async_trait;
use journal_schema::{PostPatch, PostRecord, PostSummary};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Server responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<PostRecord, StoreError>;

    /// Update request scoped to `id`
    async fn update(&self, id: &str, patch: &PostPatch) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: PostStore + ?Sized> PostStore for Arc<T> {
    async fn fetch(&self, id: &str) -> Result<PostRecord, StoreError> {
        (**self).fetch(id).await
    }

    async fn update(&self, id: &str, patch: &PostPatch) -> Result<(), StoreError> {
        (**self).update(id, patch).await
    }
}

/// `PostStore` over the `/api/posts` HTTP API
#[derive(Debug, Clone)]
pub struct HttpPostStore {
    base_url: String,
    client: Client,
}

#[derive(Serialize)]
struct CreatePost<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

impl HttpPostStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list(&self) -> Result<Vec<PostSummary>, StoreError> {
        let response = self
            .client
            .get(format!("{}/api/posts", self.base_url))
            .send()
            .await
            .map_err(transport)?;

        let response = check(response, None).await?;
        response.json().await.map_err(decode)
    }

    /// Create a draft; the server picks the title when none is given
    pub async fn create(&self, title: Option<&str>) -> Result<PostRecord, StoreError> {
        let response = self
            .client
            .post(format!("{}/api/posts", self.base_url))
            .json(&CreatePost { title })
            .send()
            .await
            .map_err(transport)?;

        let response = check(response, None).await?;
        response.json().await.map_err(decode)
    }

    fn post_url(&self, id: &str) -> String {
        format!("{}/api/posts/{}", self.base_url, id)
    }
}

#[async_trait]
impl PostStore for HttpPostStore {
    async fn fetch(&self, id: &str) -> Result<PostRecord, StoreError> {
        let response = self
            .client
            .get(self.post_url(id))
            .send()
            .await
            .map_err(transport)?;

        let response = check(response, Some(id)).await?;
        response.json().await.map_err(decode)
    }

    async fn update(&self, id: &str, patch: &PostPatch) -> Result<(), StoreError> {
        tracing::debug!(id, blocks = patch.content.blocks.len(), "PATCH post");

        let response = self
            .client
            .patch(self.post_url(id))
            .json(patch)
            .send()
            .await
            .map_err(transport)?;

        check(response, Some(id)).await?;
        Ok(())
    }
}

/// Anything but a 2xx is a failure
async fn check(response: Response, id: Option<&str>) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
        return Err(StoreError::NotFound(id.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

fn transport(e: reqwest::Error) -> StoreError {
    StoreError::Transport(e.to_string())
}

fn decode(e: reqwest::Error) -> StoreError {
    StoreError::Decode(e.to_string())
}
