//! Route handlers, grouped by flow.

pub mod otp;
pub mod password;

use std::sync::Arc;

use tb_core::services::verification::{
    CodeStore, CredentialStore, EmailNotifier, VerificationService,
};

/// Application state that holds shared services
pub struct AppState<S, N, P>
where
    S: CodeStore,
    N: EmailNotifier,
    P: CredentialStore,
{
    pub verification: Arc<VerificationService<S, N, P>>,
}
