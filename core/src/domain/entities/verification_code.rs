//! Verification code entity for OTP-login and password-change confirmation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Expiration time for verification codes, both purposes (10 minutes)
pub const CODE_TTL_MINUTES: i64 = 10;

/// The flow a code is valid for. Codes are never cross-valid between
/// purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePurpose {
    /// Email/OTP login confirmation
    OtpLogin,
    /// Password-change confirmation
    PasswordChange,
}

impl CodePurpose {
    /// Stable string form, used in storage keys and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            CodePurpose::OtpLogin => "otp_login",
            CodePurpose::PasswordChange => "password_change",
        }
    }
}

impl std::fmt::Display for CodePurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a verification code.
///
/// `Expired` is derived lazily from the clock; stores are not required to
/// persist it as a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeStatus {
    Pending,
    Consumed,
    Expired,
}

/// Verification code bound to a `(subject, purpose)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Identifier the code is bound to (an email address or a user id)
    pub subject: String,

    /// Flow the code is valid for
    pub purpose: CodePurpose,

    /// The 6-digit code value. Treated as opaque; production paths log
    /// only its digest, never the cleartext.
    pub code: String,

    /// Timestamp when the code was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp when the code expires (`issued_at + TTL`)
    pub expires_at: DateTime<Utc>,

    /// Stored status; combine with the clock via [`Self::status`]
    pub status: CodeStatus,

    /// Staged credential material, attached only to `PasswordChange` codes
    /// and applied only after a successful confirm
    pub pending_payload: Option<String>,
}

impl VerificationCode {
    /// Creates a pending code expiring `CODE_TTL_MINUTES` from now
    pub fn new(
        subject: String,
        purpose: CodePurpose,
        code: String,
        pending_payload: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self::with_expiry(
            subject,
            purpose,
            code,
            now,
            now + Duration::minutes(CODE_TTL_MINUTES),
            pending_payload,
        )
    }

    /// Creates a pending code with an explicit lifetime, for callers that
    /// own the TTL policy
    pub fn with_expiry(
        subject: String,
        purpose: CodePurpose,
        code: String,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        pending_payload: Option<String>,
    ) -> Self {
        Self {
            subject,
            purpose,
            code,
            issued_at,
            expires_at,
            status: CodeStatus::Pending,
            pending_payload,
        }
    }

    /// Checks if the verification code has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Effective status: the stored status overlaid with lazy expiry.
    /// A consumed code stays consumed; a pending code past its expiry
    /// reads as expired without any write.
    pub fn status(&self) -> CodeStatus {
        match self.status {
            CodeStatus::Consumed => CodeStatus::Consumed,
            _ if self.is_expired() => CodeStatus::Expired,
            other => other,
        }
    }

}

/// SHA-256 digest of a code value, hex encoded. Stores keep digests rather
/// than cleartext codes.
pub fn digest_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

/// Mask a subject (email or user id) for logging, keeping only a short
/// suffix.
pub fn mask_subject(subject: &str) -> String {
    let count = subject.chars().count();
    if count <= 4 {
        "****".to_string()
    } else {
        let suffix: String = subject.chars().skip(count - 4).collect();
        format!("***{}", suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(code: &str) -> VerificationCode {
        VerificationCode::new(
            "a@x.com".to_string(),
            CodePurpose::OtpLogin,
            code.to_string(),
            None,
        )
    }

    #[test]
    fn new_code_is_pending_with_ttl() {
        let code = pending("042137");
        assert_eq!(code.status(), CodeStatus::Pending);
        assert_eq!(code.expires_at, code.issued_at + Duration::minutes(CODE_TTL_MINUTES));
        assert!(!code.is_expired());
    }

    #[test]
    fn expired_code_reads_expired_without_a_write() {
        let mut code = pending("042137");
        code.expires_at = Utc::now() - Duration::seconds(1);
        assert_eq!(code.status, CodeStatus::Pending);
        assert_eq!(code.status(), CodeStatus::Expired);
    }

    #[test]
    fn consumed_wins_over_expiry() {
        let mut code = pending("042137");
        code.status = CodeStatus::Consumed;
        code.expires_at = Utc::now() - Duration::seconds(1);
        assert_eq!(code.status(), CodeStatus::Consumed);
    }

    #[test]
    fn with_expiry_honors_the_given_window() {
        let issued = Utc::now();
        let expires = issued + Duration::minutes(3);
        let code = VerificationCode::with_expiry(
            "a@x.com".to_string(),
            CodePurpose::PasswordChange,
            "042137".to_string(),
            issued,
            expires,
            Some("staged".to_string()),
        );
        assert_eq!(code.expires_at, expires);
        assert_eq!(code.status, CodeStatus::Pending);
        assert_eq!(code.pending_payload.as_deref(), Some("staged"));
    }

    #[test]
    fn digest_is_deterministic_and_not_the_code() {
        let a = digest_code("123456");
        let b = digest_code("123456");
        assert_eq!(a, b);
        assert_ne!(a, digest_code("123457"));
        assert!(!a.contains("123456"));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn mask_subject_keeps_only_suffix() {
        assert_eq!(mask_subject("a@x.com"), "***.com");
        assert_eq!(mask_subject("u1"), "****");
    }

    #[test]
    fn purpose_round_trips_through_str() {
        assert_eq!(CodePurpose::OtpLogin.as_str(), "otp_login");
        assert_eq!(CodePurpose::PasswordChange.as_str(), "password_change");
    }
}
