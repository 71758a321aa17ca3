//! Traits for the external collaborators the verification flows depend on.

use async_trait::async_trait;

/// Trait for email delivery integration.
///
/// Best-effort: a failed or slow send must neither hold the issuance path
/// open nor roll back an already-stored code.
#[async_trait]
pub trait EmailNotifier: Send + Sync {
    /// Deliver an HTML email. Returns a provider message id on success.
    async fn send(&self, to: &str, subject: &str, body_html: &str) -> Result<String, String>;
}

#[async_trait]
impl<T: EmailNotifier + ?Sized> EmailNotifier for Box<T> {
    async fn send(&self, to: &str, subject: &str, body_html: &str) -> Result<String, String> {
        (**self).send(to, subject, body_html).await
    }
}

/// Trait for the external, authoritative credential store.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Check a credential against the stored one. A check, not a mutation.
    async fn verify(&self, user_id: &str, credential: &str) -> Result<bool, String>;

    /// Replace the stored credential. Safe to retry keyed by `user_id`.
    async fn apply(&self, user_id: &str, new_credential: &str) -> Result<(), String>;

    /// Registered contact address for a user, used to deliver codes and
    /// confirmations.
    async fn contact_address(&self, user_id: &str) -> Result<String, String>;
}
