//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use cyoa_store::pg_story_repository::PgStoryRepository;
use cyoa_stories::application::loader::{ImportSummary, import_story};
use cyoa_stories::domain::definition::StoryDefinition;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use cyoa_api::state::AppState;

/// The two-page story used throughout the reader tests.
pub const DEMO_STORY: &str = r#"{
    "name": "Demo",
    "description": "d",
    "pages": [
        { "index": 0, "text": "Start", "choices": { "go north": 1 } },
        { "index": 1, "text": "End, success!", "result": "success", "choices": { "restart": 0 } }
    ]
}"#;

/// Build the full app router over a real `PgStoryRepository`.
pub fn build_test_app(pool: PgPool) -> Router {
    let story_repository = Arc::new(PgStoryRepository::new(pool.clone()));
    cyoa_api::app(AppState::new(pool, story_repository))
}

/// Import a JSON story definition straight into the database.
pub async fn load_story(pool: &PgPool, source: &str) -> ImportSummary {
    let definition = StoryDefinition::from_json(source).unwrap();
    import_story(&definition, &PgStoryRepository::new(pool.clone()))
        .await
        .unwrap()
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
