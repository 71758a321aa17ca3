//! Verification flow orchestration.
//!
//! Two flow variants built from the same primitives: OTP login
//! (`send_otp` / `verify_otp`) and password change
//! (`initiate_password_change` / `confirm_password_change`). Per
//! `(subject, purpose)` key the state machine is
//! `NoCode -> Pending -> Consumed | Expired`, with issue-while-pending
//! superseding straight into a fresh `Pending`.

use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::domain::entities::verification_code::{mask_subject, CodePurpose};
use crate::errors::{DomainError, DomainResult, ValidationError, VerificationError};

use super::config::VerificationConfig;
use super::generator::CodeGenerator;
use super::store::CodeStore;
use super::traits::{CredentialStore, EmailNotifier};
use super::types::{IssueResult, VerifyOutcome};
use super::verifier::CodeVerifier;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

/// Orchestrates code issuance and verification for both flows.
///
/// All collaborators are explicit constructor dependencies; their
/// lifecycle is owned by the process bootstrap, not by this service.
pub struct VerificationService<S, N, P>
where
    S: CodeStore,
    N: EmailNotifier,
    P: CredentialStore,
{
    store: Arc<S>,
    verifier: CodeVerifier<S>,
    notifier: Arc<N>,
    credentials: Arc<P>,
    generator: CodeGenerator,
    config: VerificationConfig,
}

impl<S, N, P> VerificationService<S, N, P>
where
    S: CodeStore,
    N: EmailNotifier,
    P: CredentialStore,
{
    pub fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        credentials: Arc<P>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            verifier: CodeVerifier::new(store.clone()),
            store,
            notifier,
            credentials,
            generator: CodeGenerator::new(),
            config,
        }
    }

    /// Issue an OTP-login code for an email address and deliver it.
    ///
    /// Issuance and delivery are not transactional: if delivery fails the
    /// stored code stays valid until its TTL, and a reissue supersedes it.
    pub async fn send_otp(&self, email: &str) -> DomainResult<IssueResult> {
        if !EMAIL_RE.is_match(email) {
            return Err(ValidationError::InvalidEmail.into());
        }

        let code = self.generator.generate();
        let expires_at = Utc::now() + Duration::minutes(self.config.code_ttl_minutes);

        self.store
            .put(email, CodePurpose::OtpLogin, &code, expires_at, None)
            .await?;

        tracing::info!(
            subject = mask_subject(email),
            purpose = %CodePurpose::OtpLogin,
            event = "code_issued",
            expires_at = %expires_at,
            "Issued OTP login code"
        );

        let message_id = self
            .notifier
            .send(
                email,
                "Your TaskBay login code",
                &otp_email_body(&code, self.config.code_ttl_minutes),
            )
            .await
            .map_err(|e| {
                tracing::warn!(
                    subject = mask_subject(email),
                    error = %e,
                    event = "code_delivery_failed",
                    "OTP delivery failed; stored code remains valid until TTL"
                );
                DomainError::from(VerificationError::NotifierFailure)
            })?;

        Ok(IssueResult {
            expires_at,
            message_id,
        })
    }

    /// Verify an OTP-login code. On `Valid` the caller (session layer)
    /// performs the actual authentication side effect.
    pub async fn verify_otp(&self, email: &str, code: &str) -> DomainResult<VerifyOutcome> {
        self.verifier.verify(email, CodePurpose::OtpLogin, code).await
    }

    /// Start a password change: check the current credential, stage the
    /// new one against a fresh code, and deliver the code to the user's
    /// registered contact address.
    ///
    /// A failed credential check never issues a code.
    pub async fn initiate_password_change(
        &self,
        user_id: &str,
        current_credential: &str,
        new_credential: &str,
    ) -> DomainResult<IssueResult> {
        require_non_empty("user_id", user_id)?;
        require_non_empty("current_password", current_credential)?;
        require_non_empty("new_password", new_credential)?;

        let current_ok = self
            .credentials
            .verify(user_id, current_credential)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Credential check failed: {}", e),
            })?;
        if !current_ok {
            tracing::warn!(
                subject = mask_subject(user_id),
                event = "credential_check_rejected",
                "Password change refused: current credential mismatch"
            );
            return Err(VerificationError::CredentialMismatch.into());
        }

        let contact = self
            .credentials
            .contact_address(user_id)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Contact lookup failed: {}", e),
            })?;

        let code = self.generator.generate();
        let expires_at = Utc::now() + Duration::minutes(self.config.code_ttl_minutes);

        self.store
            .put(
                user_id,
                CodePurpose::PasswordChange,
                &code,
                expires_at,
                Some(new_credential.to_string()),
            )
            .await?;

        tracing::info!(
            subject = mask_subject(user_id),
            purpose = %CodePurpose::PasswordChange,
            event = "code_issued",
            expires_at = %expires_at,
            "Issued password-change code with staged credential"
        );

        let message_id = self
            .notifier
            .send(
                &contact,
                "Confirm your TaskBay password change",
                &password_change_email_body(&code, self.config.code_ttl_minutes),
            )
            .await
            .map_err(|e| {
                tracing::warn!(
                    subject = mask_subject(user_id),
                    error = %e,
                    event = "code_delivery_failed",
                    "Password-change code delivery failed; stored code remains valid until TTL"
                );
                DomainError::from(VerificationError::NotifierFailure)
            })?;

        Ok(IssueResult {
            expires_at,
            message_id,
        })
    }

    /// Confirm a password change: consume the code and apply the staged
    /// credential.
    ///
    /// Consuming the code and applying the credential are one logical
    /// commit from the caller's perspective. If the apply fails after the
    /// code was consumed, the code is not resurrected (it was a
    /// legitimate one-time use) and the failure surfaces as
    /// `VerifiedNotApplied` so the apply can be retried keyed by
    /// `user_id`.
    pub async fn confirm_password_change(&self, user_id: &str, code: &str) -> DomainResult<()> {
        let outcome = self
            .verifier
            .verify(user_id, CodePurpose::PasswordChange, code)
            .await?;

        let payload = match outcome {
            VerifyOutcome::Invalid => return Err(VerificationError::InvalidCode.into()),
            VerifyOutcome::Valid { payload } => payload.ok_or_else(|| DomainError::Internal {
                message: "Consumed password-change code carried no staged credential".to_string(),
            })?,
        };

        if let Err(e) = self.credentials.apply(user_id, &payload).await {
            tracing::error!(
                subject = mask_subject(user_id),
                error = %e,
                event = "credential_apply_failed",
                "Code consumed but credential update failed; retry apply keyed by user id"
            );
            return Err(VerificationError::VerifiedNotApplied {
                user_id: user_id.to_string(),
            }
            .into());
        }

        tracing::info!(
            subject = mask_subject(user_id),
            event = "credential_applied",
            "Password change applied"
        );

        // Confirmation notification is best effort; the change is already
        // committed.
        match self.credentials.contact_address(user_id).await {
            Ok(contact) => {
                if let Err(e) = self
                    .notifier
                    .send(
                        &contact,
                        "Your TaskBay password was changed",
                        "<p>Your password was just changed. If this wasn't you, contact support immediately.</p>",
                    )
                    .await
                {
                    tracing::warn!(
                        subject = mask_subject(user_id),
                        error = %e,
                        event = "confirmation_delivery_failed",
                        "Password-change confirmation email failed"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    subject = mask_subject(user_id),
                    error = %e,
                    event = "confirmation_delivery_failed",
                    "Contact lookup for confirmation email failed"
                );
            }
        }

        Ok(())
    }

    /// Expiry of the outstanding code for a key, if any. Exposed for
    /// rate-limit/backoff decisions by outer collaborators.
    pub async fn peek_expiry(
        &self,
        subject: &str,
        purpose: CodePurpose,
    ) -> DomainResult<Option<chrono::DateTime<Utc>>> {
        self.store.peek_expiry(subject, purpose).await
    }
}

fn require_non_empty(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        }
        .into());
    }
    Ok(())
}

fn otp_email_body(code: &str, ttl_minutes: i64) -> String {
    format!(
        "<p>Your TaskBay login code is <strong>{}</strong>.</p>\
         <p>It expires in {} minutes and can be used once.</p>",
        code, ttl_minutes
    )
}

fn password_change_email_body(code: &str, ttl_minutes: i64) -> String {
    format!(
        "<p>Use code <strong>{}</strong> to confirm your password change.</p>\
         <p>It expires in {} minutes. If you didn't request this, you can ignore this email.</p>",
        code, ttl_minutes
    )
}
