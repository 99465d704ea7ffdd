//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation
//! adapters must implement.

pub mod assistant_client;
pub mod conversation_logger;
pub mod progress;
pub mod prompt_input;
pub mod remote_detector;
