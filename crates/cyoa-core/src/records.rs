//! Persisted story records.
//!
//! Stories own their pages and choices. Records are created once by the
//! loader and never updated afterwards.

use serde::Serialize;

/// Maximum length of a story title.
pub const TITLE_MAX_LEN: usize = 64;
/// Maximum length of a story description.
pub const DESCRIPTION_MAX_LEN: usize = 1024;
/// Maximum length of a page body.
pub const PAGE_TEXT_MAX_LEN: usize = 8192;
/// Maximum length of a choice label.
pub const CHOICE_TEXT_MAX_LEN: usize = 256;

/// A named, described adventure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Story {
    /// Store-assigned identifier.
    pub story_id: i32,
    /// Story title.
    pub title: String,
    /// Story description.
    pub description: String,
}

/// One narrative unit of a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Store-assigned identifier.
    pub page_id: i32,
    /// Owning story.
    pub story_id: i32,
    /// Position of the page within its source definition, starting at 0.
    #[serde(skip)]
    pub ordinal: i32,
    /// The page's `index` in its source definition.
    #[serde(skip)]
    pub source_index: i32,
    /// Body text.
    pub text: String,
    /// Signed outcome code: negative failure, positive success, zero ongoing.
    #[serde(skip)]
    pub outcome: i32,
}

/// A labeled transition between two pages of the same story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    /// Store-assigned identifier.
    pub choice_id: i32,
    /// Owning story.
    pub story_id: i32,
    /// Page the choice is offered on.
    pub page_id: i32,
    /// Player-facing label.
    pub text: String,
    /// Page the choice leads to.
    pub to_page: i32,
}

/// Insert payload for a page.
#[derive(Debug, Clone, Copy)]
pub struct NewPage<'a> {
    /// Owning story.
    pub story_id: i32,
    /// Position of the page within its source definition.
    pub ordinal: i32,
    /// The page's `index` in its source definition.
    pub source_index: i32,
    /// Body text.
    pub text: &'a str,
    /// Signed outcome code.
    pub outcome: i32,
}

/// Insert payload for a choice.
#[derive(Debug, Clone, Copy)]
pub struct NewChoice<'a> {
    /// Owning story.
    pub story_id: i32,
    /// Page the choice is offered on.
    pub page_id: i32,
    /// Player-facing label.
    pub text: &'a str,
    /// Page the choice leads to.
    pub to_page: i32,
}
