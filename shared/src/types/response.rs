//! Response envelope types for API endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unified error response structure for API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details if available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl ToString, message: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a single detail to the error response
    pub fn with_detail(mut self, key: impl ToString, value: serde_json::Value) -> Self {
        let mut details = self.details.unwrap_or_default();
        details.insert(key.to_string(), value);
        self.details = Some(details);
        self
    }
}

/// Minimal success envelope for endpoints that only confirm an action
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation message
    pub message: String,
    /// Timestamp of the response
    pub timestamp: DateTime<Utc>,
}

impl MessageResponse {
    /// Create a new confirmation response
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }
}
