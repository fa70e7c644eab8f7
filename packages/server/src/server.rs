use crate::state::{CreatePost, PostState, StateError};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use journal_schema::{PostRecord, PostSummary};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    posts: Arc<Mutex<PostState>>,
}

impl AppState {
    pub fn new(posts: PostState) -> Self {
        Self {
            posts: Arc::new(Mutex::new(posts)),
        }
    }

    fn posts(&self) -> MutexGuard<'_, PostState> {
        self.posts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl IntoResponse for StateError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            StateError::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": self.to_string() })),
            StateError::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string(), "issue": e }),
            ),
            StateError::Io(_) | StateError::Snapshot(_) => {
                tracing::error!("Failed to persist posts: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to persist posts" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route(
            "/api/posts/:id",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn list_posts(State(state): State<AppState>) -> Json<Vec<PostSummary>> {
    Json(state.posts().list())
}

async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<CreatePost>,
) -> Result<(StatusCode, Json<PostRecord>), StateError> {
    let record = state.posts().create(request)?;
    tracing::info!("Created post {}", record.id);
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostRecord>, StateError> {
    let posts = state.posts();
    Ok(Json(posts.get(&id)?.clone()))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<PostRecord>, StateError> {
    let result = state.posts().update(&id, &body);
    match &result {
        Ok(_) => tracing::info!("Updated post {}", id),
        Err(e) => tracing::warn!("Rejected update for {}: {}", id, e),
    }
    result.map(Json)
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, StateError> {
    state.posts().delete(&id)?;
    tracing::info!("Deleted post {}", id);
    Ok(StatusCode::NO_CONTENT)
}
