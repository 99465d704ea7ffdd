//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] — assistant models a session can be bound to
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod model;
