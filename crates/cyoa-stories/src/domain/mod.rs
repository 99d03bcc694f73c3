//! Story domain types.

pub mod definition;
pub mod outcome;
