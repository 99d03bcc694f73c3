//! Shared test repositories and utilities for the adventure story service.

mod repository;

pub use repository::{FailingStoryRepository, InMemoryStoryRepository};
