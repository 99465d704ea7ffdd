//! Session domain.
//!
//! - [`config::SessionConfig`] — how a new session is set up
//! - [`message::MessageOptions`] — a single prompt sent to a session
//! - [`event::SessionEvent`] — everything a session reports back
//! - [`summary::SessionSummary`] — one entry of a session listing

pub mod config;
pub mod event;
pub mod message;
pub mod summary;
