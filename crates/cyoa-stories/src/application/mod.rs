//! Application services: importing stories and reading pages.

pub mod loader;
pub mod query_handlers;
