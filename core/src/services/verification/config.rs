//! Verification service configuration.

use crate::domain::entities::verification_code::CODE_TTL_MINUTES;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Code lifetime in minutes, same for both purposes
    pub code_ttl_minutes: i64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: CODE_TTL_MINUTES,
        }
    }
}
