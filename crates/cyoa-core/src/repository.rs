//! Story repository abstraction.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::records::{Choice, NewChoice, NewPage, Page, Story};

/// Read access to persisted stories, plus the entry point for imports.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Load every story, ordered by identifier.
    async fn list_stories(&self) -> Result<Vec<Story>, DomainError>;

    /// Load a single story.
    async fn find_story(&self, story_id: i32) -> Result<Option<Story>, DomainError>;

    /// Load a page of a story.
    ///
    /// `None` selects the story's entry page: the page with the lowest
    /// ordinal, i.e. the first page of the source definition.
    async fn find_page(
        &self,
        story_id: i32,
        page_id: Option<i32>,
    ) -> Result<Option<Page>, DomainError>;

    /// Load the choices offered on a page, in definition order.
    async fn list_choices(&self, story_id: i32, page_id: i32) -> Result<Vec<Choice>, DomainError>;

    /// Open a write unit for importing one story.
    async fn begin_import(&self) -> Result<Box<dyn StoryImport>, DomainError>;
}

/// A write unit covering one loader run.
///
/// Writes become visible only after `commit`. Dropping an import without
/// committing discards everything written through it.
#[async_trait]
pub trait StoryImport: Send {
    /// Insert a story and return its assigned identifier.
    async fn create_story(&mut self, title: &str, description: &str) -> Result<i32, DomainError>;

    /// Insert a page and return its assigned identifier.
    ///
    /// Fails if the owning story does not exist.
    async fn create_page(&mut self, page: &NewPage<'_>) -> Result<i32, DomainError>;

    /// Insert a choice and return its assigned identifier.
    ///
    /// Fails if the story, the originating page or the target page does not
    /// exist.
    async fn create_choice(&mut self, choice: &NewChoice<'_>) -> Result<i32, DomainError>;

    /// Make every write of this import durable.
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}
