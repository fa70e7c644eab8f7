use axum::body::Body;
use http::{Request, StatusCode};
use journal_blocks::{Block, ContentDocument};
use journal_schema::{PostRecord, PostSummary};
use journal_server::{router, AppState, PostState};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router(state.clone())
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(state: &AppState, title: Option<&str>) -> PostRecord {
    let (status, body) = send(state, "POST", "/api/posts", Some(json!({ "title": title }))).await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn test_create_and_fetch() {
    let state = AppState::new(PostState::new());
    let record = create(&state, None).await;
    assert_eq!(record.title, "Untitled Post");

    let (status, body) = send(&state, "GET", &format!("/api/posts/{}", record.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: PostRecord = serde_json::from_value(body).unwrap();
    assert_eq!(fetched.id, record.id);
    assert!(fetched.content.is_null());
}

#[tokio::test]
async fn test_patch_stores_editor_output() {
    let state = AppState::new(PostState::new());
    let record = create(&state, Some("Day 1")).await;

    let content = ContentDocument::new(vec![Block::header("Day 1", 2), Block::paragraph("Went for a walk.")]);
    let (status, body) = send(
        &state,
        "PATCH",
        &format!("/api/posts/{}", record.id),
        Some(json!({ "title": "Day 1, revised", "content": content })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Day 1, revised");
    assert_eq!(body["published"], false);
    assert_eq!(body["content"]["blocks"][0]["type"], "header");
    assert_eq!(body["content"]["blocks"][1]["data"]["text"], "Went for a walk.");
}

#[tokio::test]
async fn test_patch_rejects_malformed_body() {
    let state = AppState::new(PostState::new());
    let record = create(&state, None).await;

    let (status, body) = send(
        &state,
        "PATCH",
        &format!("/api/posts/{}", record.id),
        Some(json!({ "title": 42, "content": { "blocks": [] } })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["issue"]["path"], "title");
}

#[tokio::test]
async fn test_unknown_post_is_404() {
    let state = AppState::new(PostState::new());

    let (status, _) = send(&state, "GET", "/api/posts/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &state,
        "PATCH",
        "/api/posts/missing",
        Some(json!({ "title": "x", "content": { "blocks": [] } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&state, "DELETE", "/api/posts/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_removes_from_listing() {
    let state = AppState::new(PostState::new());
    let keep = create(&state, Some("Keep")).await;
    let drop = create(&state, Some("Drop")).await;

    let (status, _) = send(&state, "DELETE", &format!("/api/posts/{}", drop.id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&state, "GET", "/api/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    let listing: Vec<PostSummary> = serde_json::from_value(body).unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].id, keep.id);
}

#[tokio::test]
async fn test_snapshot_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("posts.json");

    let state = AppState::new(PostState::with_snapshot(&path).unwrap());
    let record = create(&state, Some("Persisted")).await;
    assert!(path.exists());

    let reloaded = PostState::with_snapshot(&path).unwrap();
    assert_eq!(reloaded.get(&record.id).unwrap().title, "Persisted");
}
