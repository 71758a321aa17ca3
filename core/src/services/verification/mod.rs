//! Verification code subsystem.
//!
//! Issues short-lived, single-use 6-digit codes for OTP login and
//! password-change confirmation, and guarantees a code verifies a claim
//! exactly once, within its time window. Composed of:
//!
//! - [`CodeGenerator`]: cryptographically unpredictable code values
//! - [`CodeStore`]: durable keyed storage with atomic consume-once semantics
//! - [`CodeVerifier`]: outcome translation with anti-enumeration collapse
//! - [`VerificationService`]: the OTP-login and password-change flows

mod config;
mod generator;
mod service;
mod store;
mod traits;
mod types;
mod verifier;

#[cfg(test)]
mod tests;

pub use config::VerificationConfig;
pub use generator::CodeGenerator;
pub use service::VerificationService;
pub use store::{CodeStore, ConsumeOutcome};
pub use traits::{CredentialStore, EmailNotifier};
pub use types::{IssueResult, VerifyOutcome};
pub use verifier::CodeVerifier;
