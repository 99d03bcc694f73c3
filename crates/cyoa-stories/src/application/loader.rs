//! Story loader.
//!
//! Imports a story definition in two passes inside one store import:
//!
//! 1. insert the story and every page, recording definition index → page id;
//! 2. insert every non-terminal choice, resolving its target through that map.
//!
//! Choices may point forward or backward within the story, so no choice is
//! resolved before every page has an id. Nothing is committed unless both
//! passes succeed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cyoa_core::error::DomainError;
use cyoa_core::records::{NewChoice, NewPage};
use cyoa_core::repository::{StoryImport, StoryRepository};
use thiserror::Error;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::domain::definition::{DefinitionError, StoryDefinition};

/// Errors raised while loading a story definition file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The definition file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a valid story definition.
    #[error("failed to parse {path}: {source}")]
    Definition {
        /// The definition file.
        path: PathBuf,
        /// The decoding error.
        source: DefinitionError,
    },

    /// The definition could not be imported into the store.
    #[error("failed to import {path}: {source}")]
    Import {
        /// The definition file.
        path: PathBuf,
        /// The import error.
        source: DomainError,
    },
}

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Identifier assigned to the new story.
    pub story_id: i32,
    /// Number of pages inserted.
    pub pages: usize,
    /// Number of choices inserted; terminal choices are not counted.
    pub choices: usize,
    /// Definition index → assigned page id.
    pub page_ids: HashMap<i32, i32>,
}

fn to_i32(value: usize, what: &str) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| DomainError::Validation(format!("too many {what}")))
}

/// Imports one story definition.
///
/// Importing the same definition twice creates two independent stories.
///
/// # Errors
///
/// Returns `DomainError::Validation` if two pages share an index or a choice
/// targets an index no page has. Returns `DomainError::Infrastructure` if the
/// store rejects a write. In both cases nothing is persisted.
pub async fn import_story(
    definition: &StoryDefinition,
    repo: &dyn StoryRepository,
) -> Result<ImportSummary, DomainError> {
    let import_id = Uuid::new_v4();
    let span = info_span!("import_story", %import_id, title = %definition.name);
    run_import(definition, repo).instrument(span).await
}

async fn run_import(
    definition: &StoryDefinition,
    repo: &dyn StoryRepository,
) -> Result<ImportSummary, DomainError> {
    let mut import = repo.begin_import().await?;
    let story_id = import
        .create_story(&definition.name, &definition.description)
        .await?;

    // Pass 1: pages.
    let mut page_ids = HashMap::with_capacity(definition.pages.len());
    let mut created = Vec::with_capacity(definition.pages.len());
    for (ordinal, page) in definition.pages.iter().enumerate() {
        if page_ids.contains_key(&page.index) {
            return Err(DomainError::Validation(format!(
                "story {:?} defines page index {} more than once",
                definition.name, page.index
            )));
        }
        let page_id = import
            .create_page(&NewPage {
                story_id,
                ordinal: to_i32(ordinal, "pages")?,
                source_index: page.index,
                text: &page.text,
                outcome: page.outcome().code(),
            })
            .await?;
        page_ids.insert(page.index, page_id);
        created.push(page_id);
    }

    // Pass 2: choices.
    let mut choices = 0;
    for (page, &page_id) in definition.pages.iter().zip(&created) {
        for choice in page.choices.iter().filter(|c| !c.is_terminal()) {
            let to_page = *page_ids.get(&choice.target).ok_or_else(|| {
                DomainError::Validation(format!(
                    "choice {:?} on page {} targets unknown page index {}",
                    choice.label, page.index, choice.target
                ))
            })?;
            import
                .create_choice(&NewChoice {
                    story_id,
                    page_id,
                    text: &choice.label,
                    to_page,
                })
                .await?;
            choices += 1;
        }
    }

    import.commit().await?;

    info!(story_id, pages = created.len(), choices, "story imported");
    Ok(ImportSummary {
        story_id,
        pages: created.len(),
        choices,
        page_ids,
    })
}

/// Reads, decodes and imports a story definition file.
///
/// # Errors
///
/// Returns `LoadError` naming the file if reading, decoding or importing
/// fails.
pub async fn load_story_file(
    path: &Path,
    repo: &dyn StoryRepository,
) -> Result<ImportSummary, LoadError> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
    let definition =
        StoryDefinition::parse(path, &source).map_err(|source| LoadError::Definition {
            path: path.to_owned(),
            source,
        })?;
    import_story(&definition, repo)
        .await
        .map_err(|source| LoadError::Import {
            path: path.to_owned(),
            source,
        })
}
