//! Shared domain types for the prompt2film workspace.
//!
//! Holds the generation request model and its fixed parameter sets,
//! directive composition, the persisted [`project::Project`] record
//! and the common [`error::CoreError`].

pub mod error;
pub mod project;
pub mod request;
pub mod types;
