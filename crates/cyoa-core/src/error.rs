//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No story exists with the given identifier.
    #[error("story not found: {0}")]
    StoryNotFound(i32),

    /// The story exists but has no page matching the request.
    ///
    /// A `page_id` of 0 means the entry page was requested.
    #[error("page {page_id} not found in story {story_id}")]
    PageNotFound {
        /// The story that was searched.
        story_id: i32,
        /// The requested page, or 0 for the entry page.
        page_id: i32,
    },

    /// A story definition cannot be imported as written.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
