//! Test repositories — mock `StoryRepository` implementations for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cyoa_core::error::DomainError;
use cyoa_core::records::{
    CHOICE_TEXT_MAX_LEN, Choice, DESCRIPTION_MAX_LEN, NewChoice, NewPage, PAGE_TEXT_MAX_LEN, Page,
    Story, TITLE_MAX_LEN,
};
use cyoa_core::repository::{StoryImport, StoryRepository};

#[derive(Debug, Clone, Default)]
struct Tables {
    stories: Vec<Story>,
    pages: Vec<Page>,
    choices: Vec<Choice>,
    next_id: i32,
}

impl Tables {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn has_story(&self, story_id: i32) -> bool {
        self.stories.iter().any(|s| s.story_id == story_id)
    }

    fn has_page(&self, story_id: i32, page_id: i32) -> bool {
        self.pages
            .iter()
            .any(|p| p.story_id == story_id && p.page_id == page_id)
    }
}

fn check_len(column: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::Infrastructure(format!(
            "value too long for {column} (max {max})"
        )));
    }
    Ok(())
}

/// An in-memory story repository with the same referential rules as the
/// `PostgreSQL` schema.
///
/// Identifiers come from one shared counter, so story, page and choice ids
/// never coincide, and ids taken by a dropped import are not reused. An import
/// stages only its own rows and appends them to the shared tables on `commit`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every stored page.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn pages(&self) -> Vec<Page> {
        self.tables.lock().unwrap().pages.clone()
    }

    /// Returns a snapshot of every stored choice.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn choices(&self) -> Vec<Choice> {
        self.tables.lock().unwrap().choices.clone()
    }
}

#[async_trait]
impl StoryRepository for InMemoryStoryRepository {
    async fn list_stories(&self) -> Result<Vec<Story>, DomainError> {
        Ok(self.tables.lock().unwrap().stories.clone())
    }

    async fn find_story(&self, story_id: i32) -> Result<Option<Story>, DomainError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .stories
            .iter()
            .find(|s| s.story_id == story_id)
            .cloned())
    }

    async fn find_page(
        &self,
        story_id: i32,
        page_id: Option<i32>,
    ) -> Result<Option<Page>, DomainError> {
        let tables = self.tables.lock().unwrap();
        let mut pages = tables.pages.iter().filter(|p| p.story_id == story_id);
        let page = match page_id {
            Some(page_id) => pages.find(|p| p.page_id == page_id),
            None => pages.min_by_key(|p| p.ordinal),
        };
        Ok(page.cloned())
    }

    async fn list_choices(&self, story_id: i32, page_id: i32) -> Result<Vec<Choice>, DomainError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .choices
            .iter()
            .filter(|c| c.story_id == story_id && c.page_id == page_id)
            .cloned()
            .collect())
    }

    async fn begin_import(&self) -> Result<Box<dyn StoryImport>, DomainError> {
        Ok(Box::new(InMemoryStoryImport {
            target: Arc::clone(&self.tables),
            staged: Tables::default(),
        }))
    }
}

struct InMemoryStoryImport {
    target: Arc<Mutex<Tables>>,
    staged: Tables,
}

impl InMemoryStoryImport {
    fn allocate_id(&self) -> i32 {
        self.target.lock().unwrap().allocate_id()
    }

    fn has_story(&self, story_id: i32) -> bool {
        self.staged.has_story(story_id) || self.target.lock().unwrap().has_story(story_id)
    }

    fn has_page(&self, story_id: i32, page_id: i32) -> bool {
        self.staged.has_page(story_id, page_id)
            || self.target.lock().unwrap().has_page(story_id, page_id)
    }
}

#[async_trait]
impl StoryImport for InMemoryStoryImport {
    async fn create_story(&mut self, title: &str, description: &str) -> Result<i32, DomainError> {
        check_len("stories.title", title, TITLE_MAX_LEN)?;
        check_len("stories.description", description, DESCRIPTION_MAX_LEN)?;
        let story_id = self.allocate_id();
        self.staged.stories.push(Story {
            story_id,
            title: title.to_owned(),
            description: description.to_owned(),
        });
        Ok(story_id)
    }

    async fn create_page(&mut self, page: &NewPage<'_>) -> Result<i32, DomainError> {
        check_len("pages.text", page.text, PAGE_TEXT_MAX_LEN)?;
        if !self.has_story(page.story_id) {
            return Err(DomainError::Infrastructure(format!(
                "foreign key violation: story {} does not exist",
                page.story_id
            )));
        }
        let page_id = self.allocate_id();
        self.staged.pages.push(Page {
            page_id,
            story_id: page.story_id,
            ordinal: page.ordinal,
            source_index: page.source_index,
            text: page.text.to_owned(),
            outcome: page.outcome,
        });
        Ok(page_id)
    }

    async fn create_choice(&mut self, choice: &NewChoice<'_>) -> Result<i32, DomainError> {
        check_len("choices.text", choice.text, CHOICE_TEXT_MAX_LEN)?;
        for page_id in [choice.page_id, choice.to_page] {
            if !self.has_page(choice.story_id, page_id) {
                return Err(DomainError::Infrastructure(format!(
                    "foreign key violation: page {page_id} does not exist in story {}",
                    choice.story_id
                )));
            }
        }
        let choice_id = self.allocate_id();
        self.staged.choices.push(Choice {
            choice_id,
            story_id: choice.story_id,
            page_id: choice.page_id,
            text: choice.text.to_owned(),
            to_page: choice.to_page,
        });
        Ok(choice_id)
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let this = *self;
        let Tables {
            stories,
            pages,
            choices,
            ..
        } = this.staged;
        let mut tables = this.target.lock().unwrap();
        tables.stories.extend(stories);
        tables.pages.extend(pages);
        tables.choices.extend(choices);
        Ok(())
    }
}

/// A story repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingStoryRepository;

#[async_trait]
impl StoryRepository for FailingStoryRepository {
    async fn list_stories(&self) -> Result<Vec<Story>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn find_story(&self, _story_id: i32) -> Result<Option<Story>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn find_page(
        &self,
        _story_id: i32,
        _page_id: Option<i32>,
    ) -> Result<Option<Page>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn list_choices(
        &self,
        _story_id: i32,
        _page_id: i32,
    ) -> Result<Vec<Choice>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn begin_import(&self) -> Result<Box<dyn StoryImport>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_overlapping_imports_both_persist() {
        // Arrange
        let repo = InMemoryStoryRepository::new();
        let mut first = repo.begin_import().await.unwrap();
        let mut second = repo.begin_import().await.unwrap();
        first.create_story("First", "").await.unwrap();
        second.create_story("Second", "").await.unwrap();

        // Act
        first.commit().await.unwrap();
        second.commit().await.unwrap();

        // Assert
        let titles: Vec<String> = repo
            .list_stories()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, ["First", "Second"]);
    }

    #[tokio::test]
    async fn test_dropped_import_leaves_tables_untouched() {
        // Arrange
        let repo = InMemoryStoryRepository::new();
        let mut import = repo.begin_import().await.unwrap();
        import.create_story("Abandoned", "").await.unwrap();

        // Act
        drop(import);

        // Assert
        assert!(repo.list_stories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_choice_may_target_page_committed_earlier_in_same_story() {
        // Arrange
        let repo = InMemoryStoryRepository::new();
        let mut import = repo.begin_import().await.unwrap();
        let story_id = import.create_story("Story", "").await.unwrap();
        let page_id = import
            .create_page(&NewPage {
                story_id,
                ordinal: 0,
                source_index: 1,
                text: "Start",
                outcome: 0,
            })
            .await
            .unwrap();
        import.commit().await.unwrap();

        // Act
        let mut later = repo.begin_import().await.unwrap();
        let result = later
            .create_choice(&NewChoice {
                story_id,
                page_id,
                text: "wait",
                to_page: page_id,
            })
            .await;

        // Assert
        assert!(result.is_ok());
    }
}
