//! Copilot CLI adapter
//!
//! Implements [`AssistantClient`](recipes_application::AssistantClient) for
//! the GitHub Copilot CLI running in server mode.

pub mod client;
pub mod error;
pub mod events;
pub mod protocol;
pub mod router;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod fake_cli;
