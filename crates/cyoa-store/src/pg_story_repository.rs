//! `PostgreSQL` implementation of the `StoryRepository` trait.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use cyoa_core::error::DomainError;
use cyoa_core::records::{Choice, NewChoice, NewPage, Page, Story};
use cyoa_core::repository::{StoryImport, StoryRepository};

#[derive(sqlx::FromRow)]
struct StoryRow {
    story_id: i32,
    title: String,
    description: String,
}

impl From<StoryRow> for Story {
    fn from(row: StoryRow) -> Self {
        Self {
            story_id: row.story_id,
            title: row.title,
            description: row.description,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PageRow {
    page_id: i32,
    story_id: i32,
    ordinal: i32,
    source_index: i32,
    text: String,
    outcome: i32,
}

impl From<PageRow> for Page {
    fn from(row: PageRow) -> Self {
        Self {
            page_id: row.page_id,
            story_id: row.story_id,
            ordinal: row.ordinal,
            source_index: row.source_index,
            text: row.text,
            outcome: row.outcome,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ChoiceRow {
    choice_id: i32,
    story_id: i32,
    page_id: i32,
    text: String,
    to_page: i32,
}

impl From<ChoiceRow> for Choice {
    fn from(row: ChoiceRow) -> Self {
        Self {
            choice_id: row.choice_id,
            story_id: row.story_id,
            page_id: row.page_id,
            text: row.text,
            to_page: row.to_page,
        }
    }
}

#[allow(clippy::needless_pass_by_value)]
fn infrastructure(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}

/// PostgreSQL-backed story repository.
#[derive(Debug, Clone)]
pub struct PgStoryRepository {
    pool: PgPool,
}

impl PgStoryRepository {
    /// Creates a new `PgStoryRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoryRepository for PgStoryRepository {
    async fn list_stories(&self) -> Result<Vec<Story>, DomainError> {
        let rows: Vec<StoryRow> =
            sqlx::query_as("SELECT story_id, title, description FROM stories ORDER BY story_id")
                .fetch_all(&self.pool)
                .await
                .map_err(infrastructure)?;
        Ok(rows.into_iter().map(Story::from).collect())
    }

    async fn find_story(&self, story_id: i32) -> Result<Option<Story>, DomainError> {
        let row: Option<StoryRow> =
            sqlx::query_as("SELECT story_id, title, description FROM stories WHERE story_id = $1")
                .bind(story_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(infrastructure)?;
        Ok(row.map(Story::from))
    }

    async fn find_page(
        &self,
        story_id: i32,
        page_id: Option<i32>,
    ) -> Result<Option<Page>, DomainError> {
        let query = match page_id {
            Some(page_id) => sqlx::query_as::<_, PageRow>(
                "SELECT page_id, story_id, ordinal, source_index, text, outcome FROM pages \
                 WHERE story_id = $1 AND page_id = $2",
            )
            .bind(story_id)
            .bind(page_id),
            None => sqlx::query_as::<_, PageRow>(
                "SELECT page_id, story_id, ordinal, source_index, text, outcome FROM pages \
                 WHERE story_id = $1 ORDER BY ordinal LIMIT 1",
            )
            .bind(story_id),
        };
        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(infrastructure)?;
        Ok(row.map(Page::from))
    }

    async fn list_choices(&self, story_id: i32, page_id: i32) -> Result<Vec<Choice>, DomainError> {
        let rows: Vec<ChoiceRow> = sqlx::query_as(
            "SELECT choice_id, story_id, page_id, text, to_page FROM choices \
             WHERE story_id = $1 AND page_id = $2 ORDER BY choice_id",
        )
        .bind(story_id)
        .bind(page_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)?;
        Ok(rows.into_iter().map(Choice::from).collect())
    }

    async fn begin_import(&self) -> Result<Box<dyn StoryImport>, DomainError> {
        let tx = self.pool.begin().await.map_err(infrastructure)?;
        Ok(Box::new(PgStoryImport { tx }))
    }
}

/// A story import running inside one database transaction.
///
/// Dropping it without calling `commit` rolls the transaction back.
pub struct PgStoryImport {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoryImport for PgStoryImport {
    async fn create_story(&mut self, title: &str, description: &str) -> Result<i32, DomainError> {
        let (story_id,): (i32,) = sqlx::query_as(
            "INSERT INTO stories (title, description) VALUES ($1, $2) RETURNING story_id",
        )
        .bind(title)
        .bind(description)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(infrastructure)?;
        Ok(story_id)
    }

    async fn create_page(&mut self, page: &NewPage<'_>) -> Result<i32, DomainError> {
        let (page_id,): (i32,) = sqlx::query_as(
            "INSERT INTO pages (story_id, ordinal, source_index, text, outcome) \
             VALUES ($1, $2, $3, $4, $5) RETURNING page_id",
        )
        .bind(page.story_id)
        .bind(page.ordinal)
        .bind(page.source_index)
        .bind(page.text)
        .bind(page.outcome)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(infrastructure)?;
        Ok(page_id)
    }

    async fn create_choice(&mut self, choice: &NewChoice<'_>) -> Result<i32, DomainError> {
        let (choice_id,): (i32,) = sqlx::query_as(
            "INSERT INTO choices (story_id, page_id, text, to_page) \
             VALUES ($1, $2, $3, $4) RETURNING choice_id",
        )
        .bind(choice.story_id)
        .bind(choice.page_id)
        .bind(choice.text)
        .bind(choice.to_page)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(infrastructure)?;
        Ok(choice_id)
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let this = *self;
        this.tx.commit().await.map_err(infrastructure)
    }
}
