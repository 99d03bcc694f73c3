//! Shared application state.

use std::sync::Arc;

use cyoa_core::repository::StoryRepository;
use sqlx::PgPool;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool, used directly by the health check.
    pub db_pool: PgPool,
    /// Story store the reader queries.
    pub story_repository: Arc<dyn StoryRepository>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(db_pool: PgPool, story_repository: Arc<dyn StoryRepository>) -> Self {
        Self {
            db_pool,
            story_repository,
        }
    }
}
