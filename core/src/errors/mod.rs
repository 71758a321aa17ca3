//! Domain-specific error types and error handling.
//!
//! The store and verifier report precise internal kinds; the orchestrator
//! and the HTTP boundary narrow them to the external taxonomy. In particular
//! every code-verification failure collapses to `InvalidCode` before it
//! leaves the process, so callers cannot distinguish a wrong code from an
//! expired or already-consumed one.

use thiserror::Error;

/// Input validation errors (caller's fault, 400-class)
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid length: {field} (expected: {expected}, actual: {actual})")]
    InvalidLength {
        field: String,
        expected: usize,
        actual: usize,
    },
}

/// Verification-flow errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerificationError {
    /// Collapsed external kind for mismatch, expiry, prior consumption and
    /// absence. The internal distinction only ever reaches logs.
    #[error("Invalid or expired verification code")]
    InvalidCode,

    /// The current credential presented at password-change initiation did
    /// not match the stored one. No code is issued in this case.
    #[error("Current credential check failed")]
    CredentialMismatch,

    /// Code delivery failed. The issued code is still stored and stays
    /// valid until its TTL; a reissue supersedes it.
    #[error("Verification code issued but delivery failed")]
    NotifierFailure,

    /// The code was legitimately consumed but the credential apply step
    /// failed. The code is not resurrected; the apply must be retried
    /// keyed by the user id.
    #[error("Code verified but credential update failed for user {user_id}")]
    VerifiedNotApplied { user_id: String },
}

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Storage error: {message}")]
    Store { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    ValidationErr(#[from] ValidationError),

    #[error(transparent)]
    Verification(#[from] VerificationError),
}

pub type DomainResult<T> = Result<T, DomainError>;
