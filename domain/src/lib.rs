//! Domain layer for copilot-recipes
//!
//! This crate contains the value objects the recipes exchange with the
//! assistant client: models, session configuration, the closed set of
//! session events, and the small amount of pure parsing the recipes need.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A stateful conversation with the assistant, identified by a string and
//! optionally persisted by the backend across process restarts. Sessions
//! are configured with [`SessionConfig`] and fed prompts via
//! [`MessageOptions`].
//!
//! ## Event
//!
//! Everything a session reports while it works is a [`SessionEvent`]:
//! assistant text, tool start/completion, idle and error signals.

pub mod core;
pub mod interaction;
pub mod prompt;
pub mod remote;
pub mod session;

// Re-export commonly used types
pub use core::{error::DomainError, model::Model};
pub use interaction::{ExitCommand, is_exit_command};
pub use prompt::PromptTemplate;
pub use remote::{RepoSlug, parse_github_remote};
pub use session::{
    config::{SessionConfig, SystemMessage, SystemMessageMode},
    event::SessionEvent,
    message::{Attachment, MessageOptions},
    summary::SessionSummary,
};
