//! HTTP email delivery client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use tb_core::domain::entities::verification_code::mask_subject;
use tb_core::services::verification::EmailNotifier;
use tb_shared::config::EmailConfig;

use crate::InfrastructureError;

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Email notifier backed by a hosted JSON email API
pub struct HttpEmailNotifier {
    client: reqwest::Client,
    config: EmailConfig,
}

impl HttpEmailNotifier {
    pub fn new(config: EmailConfig) -> Result<Self, InfrastructureError> {
        if config.endpoint.is_empty() {
            return Err(InfrastructureError::Config(
                "EMAIL_API_ENDPOINT is not set".to_string(),
            ));
        }
        if config.api_key.is_empty() {
            return Err(InfrastructureError::Config(
                "EMAIL_API_KEY is not set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(InfrastructureError::Http)?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl EmailNotifier for HttpEmailNotifier {
    async fn send(&self, to: &str, subject: &str, body_html: &str) -> Result<String, String> {
        let request = SendEmailRequest {
            from: &self.config.from_address,
            to,
            subject,
            html: body_html,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("email request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                to = mask_subject(to),
                status = status.as_u16(),
                "Email provider rejected send"
            );
            return Err(format!("email provider returned {}: {}", status, body));
        }

        let parsed: SendEmailResponse = response
            .json()
            .await
            .map_err(|e| format!("email provider response unreadable: {}", e))?;

        debug!(
            to = mask_subject(to),
            message_id = %parsed.id,
            "Email accepted by provider"
        );
        Ok(parsed.id)
    }
}
