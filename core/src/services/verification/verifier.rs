//! Code verification with anti-enumeration collapse.

use std::sync::Arc;

use crate::domain::entities::verification_code::{mask_subject, CodePurpose};
use crate::errors::DomainResult;

use super::store::{CodeStore, ConsumeOutcome};
use super::types::VerifyOutcome;

/// Validates a presented code against stored state.
///
/// Delegates the actual check-and-consume to the store and translates the
/// precise outcome into the two externally visible ones. The caller is
/// never told why a code failed; the internal kind is preserved as a
/// structured log event for operators.
pub struct CodeVerifier<S: CodeStore> {
    store: Arc<S>,
}

impl<S: CodeStore> CodeVerifier<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Verify a submitted code for a `(subject, purpose)` key.
    ///
    /// No retry or backoff logic lives here; attempt throttling is an
    /// outer collaborator's concern.
    pub async fn verify(
        &self,
        subject: &str,
        purpose: CodePurpose,
        submitted_code: &str,
    ) -> DomainResult<VerifyOutcome> {
        let outcome = self.store.try_consume(subject, purpose, submitted_code).await?;

        match outcome {
            ConsumeOutcome::Consumed { payload } => {
                tracing::info!(
                    subject = mask_subject(subject),
                    purpose = %purpose,
                    event = "code_consumed",
                    "Verification code consumed"
                );
                Ok(VerifyOutcome::Valid { payload })
            }
            kind => {
                tracing::warn!(
                    subject = mask_subject(subject),
                    purpose = %purpose,
                    kind = internal_kind(&kind),
                    event = "code_rejected",
                    "Verification attempt rejected"
                );
                Ok(VerifyOutcome::Invalid)
            }
        }
    }
}

/// Internal failure kind label for logging and metrics.
fn internal_kind(outcome: &ConsumeOutcome) -> &'static str {
    match outcome {
        ConsumeOutcome::Consumed { .. } => "consumed",
        ConsumeOutcome::Mismatch => "mismatch",
        ConsumeOutcome::Expired => "expired",
        ConsumeOutcome::NotFound => "not_found",
        ConsumeOutcome::AlreadyConsumed => "already_consumed",
    }
}
