//! Result types for verification operations.

use chrono::{DateTime, Utc};

/// Result of a successful code issuance
#[derive(Debug, Clone)]
pub struct IssueResult {
    /// When the issued code expires
    pub expires_at: DateTime<Utc>,
    /// Provider message id from the notifier
    pub message_id: String,
}

/// Externally visible outcome of a verification attempt.
///
/// All failure kinds are collapsed into `Invalid`; the internal
/// distinction (mismatch, expired, consumed, not found) stays in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The code was valid and has been consumed. Carries the staged
    /// payload for purposes that define one.
    Valid { payload: Option<String> },
    /// The code did not verify. No reason is disclosed.
    Invalid,
}

impl VerifyOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerifyOutcome::Valid { .. })
    }
}
