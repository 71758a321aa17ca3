//! Email delivery configuration module

use serde::{Deserialize, Serialize};

/// Email service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Email service provider ("http" or "mock")
    pub provider: String,

    /// HTTP endpoint of the email delivery API
    pub endpoint: String,

    /// API key for the email delivery API
    pub api_key: String,

    /// From address used for all outgoing mail
    pub from_address: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            endpoint: String::new(),
            api_key: String::new(),
            from_address: "no-reply@taskbay.example".to_string(),
            request_timeout_secs: default_timeout(),
        }
    }
}

impl EmailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            provider: std::env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "mock".to_string()),
            endpoint: std::env::var("EMAIL_API_ENDPOINT").unwrap_or_default(),
            api_key: std::env::var("EMAIL_API_KEY").unwrap_or_default(),
            from_address: std::env::var("EMAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| "no-reply@taskbay.example".to_string()),
            request_timeout_secs: std::env::var("EMAIL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
        }
    }
}
