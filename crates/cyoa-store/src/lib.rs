//! Cyoa Store — `PostgreSQL` persistence for stories, pages and choices.

pub mod pg_story_repository;
pub mod schema;
