//! Session listing entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry returned when listing persisted sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub start_time: Option<DateTime<Utc>>,
    pub modified_time: Option<DateTime<Utc>>,
    /// Short description of the conversation, if the backend produced one
    pub summary: Option<String>,
}

impl SessionSummary {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            start_time: None,
            modified_time: None,
            summary: None,
        }
    }
}
