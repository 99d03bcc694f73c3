//! Query handlers for the story reader.
//!
//! Every query is stateless: the reader's position is the `(story_id,
//! page_id)` pair it sends, and navigation history lives with the client.

use cyoa_core::error::DomainError;
use cyoa_core::records::{Choice, Page, Story};
use cyoa_core::repository::StoryRepository;
use serde::Serialize;
use tracing::debug;

use crate::domain::outcome::Outcome;

/// Page id that asks for the story's entry page.
pub const ENTRY_PAGE: i32 = 0;

/// Read-only view of the story catalog.
#[derive(Debug, Serialize)]
pub struct StoryListView {
    /// Every story, in id order.
    pub stories: Vec<Story>,
}

/// Read-only view of one page of a story.
#[derive(Debug, Serialize)]
pub struct StoryPageView {
    /// The story being read.
    pub story: Story,
    /// The resolved page.
    pub page: Page,
    /// `"success"`, `"failure"`, or empty while the story goes on.
    pub result: &'static str,
    /// Whether the page ends the story with a win or a loss.
    pub ended: bool,
    /// Choices offered on the page.
    pub choices: Vec<Choice>,
}

/// Derives the reader-facing result label from a page's outcome code.
#[must_use]
pub fn result_label(outcome: i32) -> &'static str {
    Outcome::from_code(outcome).label()
}

/// Lists every story.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store cannot be read.
pub async fn list_stories(repo: &dyn StoryRepository) -> Result<StoryListView, DomainError> {
    let stories = repo.list_stories().await?;
    Ok(StoryListView { stories })
}

/// Resolves a page of a story together with its choices.
///
/// A `page_id` of [`ENTRY_PAGE`] selects the story's entry page.
///
/// # Errors
///
/// Returns `DomainError::StoryNotFound` if the story does not exist,
/// `DomainError::PageNotFound` if the story has no such page (or no pages at
/// all), and `DomainError::Infrastructure` if the store cannot be read.
pub async fn show_page(
    story_id: i32,
    page_id: i32,
    repo: &dyn StoryRepository,
) -> Result<StoryPageView, DomainError> {
    let story = repo
        .find_story(story_id)
        .await?
        .ok_or(DomainError::StoryNotFound(story_id))?;

    let requested = (page_id != ENTRY_PAGE).then_some(page_id);
    let page = repo
        .find_page(story_id, requested)
        .await?
        .ok_or(DomainError::PageNotFound { story_id, page_id })?;

    let choices = repo.list_choices(story_id, page.page_id).await?;
    let outcome = Outcome::from_code(page.outcome);
    let result = outcome.label();
    debug!(
        story_id,
        page_id = page.page_id,
        choices = choices.len(),
        result,
        "resolved story page"
    );

    Ok(StoryPageView {
        story,
        page,
        result,
        ended: outcome.is_terminal(),
        choices,
    })
}
