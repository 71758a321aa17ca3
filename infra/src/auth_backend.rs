//! Hosted auth backend client.
//!
//! Implements the core `CredentialStore` trait against the auth backend's
//! admin HTTP API, which remains the authority for user credentials. This
//! crate only verifies, applies and looks up; it never stores credential
//! material itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use tb_core::domain::entities::verification_code::mask_subject;
use tb_core::services::verification::CredentialStore;
use tb_shared::config::AuthBackendConfig;

use crate::InfrastructureError;

#[derive(Serialize)]
struct VerifyPasswordRequest<'a> {
    user_id: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct VerifyPasswordResponse {
    valid: bool,
}

#[derive(Serialize)]
struct UpdatePasswordRequest<'a> {
    password: &'a str,
}

#[derive(Deserialize)]
struct UserResponse {
    email: String,
}

/// HTTP client for the hosted auth backend's admin API
pub struct AuthBackendClient {
    client: reqwest::Client,
    config: AuthBackendConfig,
}

impl AuthBackendClient {
    pub fn new(config: AuthBackendConfig) -> Result<Self, InfrastructureError> {
        if config.service_key.is_empty() {
            return Err(InfrastructureError::Config(
                "AUTH_BACKEND_SERVICE_KEY is not set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(InfrastructureError::Http)?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl CredentialStore for AuthBackendClient {
    async fn verify(&self, user_id: &str, credential: &str) -> Result<bool, String> {
        let response = self
            .client
            .post(self.url("/admin/password/verify"))
            .bearer_auth(&self.config.service_key)
            .json(&VerifyPasswordRequest {
                user_id,
                password: credential,
            })
            .send()
            .await
            .map_err(|e| format!("auth backend unreachable: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("auth backend returned {}", status));
        }

        let parsed: VerifyPasswordResponse = response
            .json()
            .await
            .map_err(|e| format!("auth backend response unreadable: {}", e))?;

        debug!(
            user = mask_subject(user_id),
            valid = parsed.valid,
            "Credential check completed"
        );
        Ok(parsed.valid)
    }

    async fn apply(&self, user_id: &str, new_credential: &str) -> Result<(), String> {
        let response = self
            .client
            .put(self.url(&format!("/admin/users/{}/password", user_id)))
            .bearer_auth(&self.config.service_key)
            .json(&UpdatePasswordRequest {
                password: new_credential,
            })
            .send()
            .await
            .map_err(|e| format!("auth backend unreachable: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                user = mask_subject(user_id),
                status = status.as_u16(),
                "Credential update rejected by auth backend"
            );
            return Err(format!("auth backend returned {}", status));
        }
        Ok(())
    }

    async fn contact_address(&self, user_id: &str) -> Result<String, String> {
        let response = self
            .client
            .get(self.url(&format!("/admin/users/{}", user_id)))
            .bearer_auth(&self.config.service_key)
            .send()
            .await
            .map_err(|e| format!("auth backend unreachable: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("auth backend returned {}", status));
        }

        let parsed: UserResponse = response
            .json()
            .await
            .map_err(|e| format!("auth backend response unreadable: {}", e))?;
        Ok(parsed.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_duplicate_slash() {
        let config = AuthBackendConfig {
            base_url: "http://localhost:9999/".to_string(),
            service_key: "k".to_string(),
            request_timeout_secs: 5,
        };
        let client = AuthBackendClient::new(config).unwrap();
        assert_eq!(
            client.url("/admin/users/u1"),
            "http://localhost:9999/admin/users/u1"
        );
    }

    #[test]
    fn missing_service_key_is_a_config_error() {
        let config = AuthBackendConfig {
            service_key: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            AuthBackendClient::new(config),
            Err(InfrastructureError::Config(_))
        ));
    }
}
