//! Story definition files.
//!
//! A definition names the story and lists its pages. Each page carries a
//! definition-local `index`, and its choices refer to other pages by that
//! index. A choice target of [`TERMINAL_TARGET`] means the branch ends there.
//!
//! ```json
//! {
//!   "name": "Demo",
//!   "description": "d",
//!   "pages": [
//!     { "index": 0, "text": "Start", "choices": { "go north": 1 } },
//!     { "index": 1, "text": "End, success!", "result": "success", "choices": { "restart": 0 } }
//!   ]
//! }
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::domain::outcome::Outcome;

/// Choice target that marks the end of a branch rather than a page.
pub const TERMINAL_TARGET: i32 = 0;

/// Errors raised while decoding a story definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The JSON document is malformed or misses a required field.
    #[error("invalid JSON story definition: {0}")]
    Json(#[from] serde_json::Error),

    /// The YAML document is malformed or misses a required field.
    #[error("invalid YAML story definition: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension is not a supported definition format.
    #[error("unsupported story definition format {0:?}: expected .json, .yaml or .yml")]
    UnsupportedFormat(String),
}

/// A complete story as written by its author.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryDefinition {
    /// Story title.
    pub name: String,
    /// Story description.
    pub description: String,
    /// Pages in definition order. The first page is the entry page.
    pub pages: Vec<PageDefinition>,
}

/// One page of a story definition.
#[derive(Debug, Clone, Deserialize)]
pub struct PageDefinition {
    /// Definition-local page index, unique within the story.
    pub index: i32,
    /// Body text.
    pub text: String,
    /// Optional `"success"` or `"failure"` tag.
    #[serde(default)]
    pub result: Option<String>,
    /// Choices in the order they were written.
    #[serde(deserialize_with = "ordered_choices")]
    pub choices: Vec<ChoiceDefinition>,
}

/// A labeled reference from one page to another by definition index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceDefinition {
    /// Player-facing label.
    pub label: String,
    /// Index of the target page, or [`TERMINAL_TARGET`].
    pub target: i32,
}

impl ChoiceDefinition {
    /// Whether this choice ends the branch instead of leading to a page.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.target == TERMINAL_TARGET
    }
}

impl PageDefinition {
    /// The outcome implied by the page's `result` tag.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        Outcome::from_result_tag(self.result.as_deref())
    }
}

impl StoryDefinition {
    /// Decodes a JSON story definition.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::Json` if the document is malformed.
    pub fn from_json(source: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Decodes a YAML story definition.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::Yaml` if the document is malformed.
    pub fn from_yaml(source: &str) -> Result<Self, DefinitionError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Decodes a story definition, picking the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::UnsupportedFormat` for unknown extensions, or
    /// the decoding error of the chosen format.
    pub fn parse(path: &Path, source: &str) -> Result<Self, DefinitionError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Self::from_json(source),
            "yaml" | "yml" => Self::from_yaml(source),
            _ => Err(DefinitionError::UnsupportedFormat(extension)),
        }
    }
}

/// Whether `path` has an extension `StoryDefinition::parse` understands.
#[must_use]
pub fn is_definition_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ext.eq_ignore_ascii_case("json")
                || ext.eq_ignore_ascii_case("yaml")
                || ext.eq_ignore_ascii_case("yml")
        })
}

/// Decodes a label → target mapping while keeping document order.
///
/// A repeated label keeps its first position and takes the last target.
fn ordered_choices<'de, D>(deserializer: D) -> Result<Vec<ChoiceDefinition>, D::Error>
where
    D: Deserializer<'de>,
{
    let choices = IndexMap::<String, i32>::deserialize(deserializer)?;
    Ok(choices
        .into_iter()
        .map(|(label, target)| ChoiceDefinition { label, target })
        .collect())
}
