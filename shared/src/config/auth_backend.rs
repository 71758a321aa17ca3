//! Hosted auth backend configuration module

use serde::{Deserialize, Serialize};

/// Configuration for the hosted auth backend that owns user credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthBackendConfig {
    /// Base URL of the auth backend admin API
    pub base_url: String,

    /// Service-role API key (server side only, never exposed to clients)
    pub service_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_timeout() -> u64 {
    10
}

impl Default for AuthBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9999".to_string(),
            service_key: String::new(),
            request_timeout_secs: default_timeout(),
        }
    }
}

impl AuthBackendConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("AUTH_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:9999".to_string()),
            service_key: std::env::var("AUTH_BACKEND_SERVICE_KEY").unwrap_or_default(),
            request_timeout_secs: std::env::var("AUTH_BACKEND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
        }
    }
}
