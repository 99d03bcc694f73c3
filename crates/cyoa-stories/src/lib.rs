//! Cyoa Stories — the story bounded context.
//!
//! Responsible for reading story definition files, importing them into the
//! story store, and resolving the page a reader is looking at.

pub mod application;
pub mod domain;
