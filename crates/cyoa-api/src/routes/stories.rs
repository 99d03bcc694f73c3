//! Routes for the story reader.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use tracing::instrument;

use cyoa_stories::application::query_handlers::{self, ENTRY_PAGE, StoryListView, StoryPageView};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
#[instrument(skip(state))]
async fn list_stories(State(state): State<AppState>) -> Result<Json<StoryListView>, ApiError> {
    let view = query_handlers::list_stories(&*state.story_repository).await?;
    Ok(Json(view))
}

/// GET /story/{story_id}
#[instrument(skip(state))]
async fn show_entry_page(
    State(state): State<AppState>,
    Path(story_id): Path<i32>,
) -> Result<Json<StoryPageView>, ApiError> {
    let view = query_handlers::show_page(story_id, ENTRY_PAGE, &*state.story_repository).await?;
    Ok(Json(view))
}

/// GET /story/{story_id}/{page_id}
#[instrument(skip(state))]
async fn show_page(
    State(state): State<AppState>,
    Path((story_id, page_id)): Path<(i32, i32)>,
) -> Result<Json<StoryPageView>, ApiError> {
    let view = query_handlers::show_page(story_id, page_id, &*state.story_repository).await?;
    Ok(Json(view))
}

/// Returns the router for the story reader.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stories))
        .route("/story/{story_id}", get(show_entry_page))
        .route("/story/{story_id}/{page_id}", get(show_page))
}
