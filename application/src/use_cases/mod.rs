//! Use cases
//!
//! One use case per recipe, plus the pieces they share: scoped cleanup,
//! the interactive follow-up loop and repository resolution.

pub mod error;
pub mod follow_up;
pub mod multiple_sessions;
pub mod organize_files;
pub mod persist_sessions;
pub mod pr_visualization;
pub mod resolve_repo;
pub mod scope;
pub mod single_prompt;
