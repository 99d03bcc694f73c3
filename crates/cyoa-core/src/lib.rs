//! Cyoa Core — shared records and storage abstractions.
//!
//! This crate defines the story, page and choice records together with the
//! repository traits that the loader, the reader and the `PostgreSQL` store
//! agree on. It contains no infrastructure code.

pub mod error;
pub mod records;
pub mod repository;
