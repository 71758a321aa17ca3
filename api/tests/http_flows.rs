//! End-to-end HTTP tests over the real route table with in-memory
//! collaborators standing in for Redis, the email provider and the auth
//! backend.

use actix_web::{test, web};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tb_api::app::create_app;
use tb_api::routes::AppState;
use tb_core::domain::entities::verification_code::{digest_code, CodePurpose};
use tb_core::errors::DomainResult;
use tb_core::services::verification::{
    CodeStore, ConsumeOutcome, CredentialStore, EmailNotifier, VerificationConfig,
    VerificationService,
};

struct StoredEntry {
    digest: String,
    expires_at: DateTime<Utc>,
    consumed: bool,
    payload: Option<String>,
}

#[derive(Default)]
struct InMemoryCodeStore {
    entries: Mutex<HashMap<(String, CodePurpose), StoredEntry>>,
}

#[async_trait]
impl CodeStore for InMemoryCodeStore {
    async fn put(
        &self,
        subject: &str,
        purpose: CodePurpose,
        code: &str,
        expires_at: DateTime<Utc>,
        payload: Option<String>,
    ) -> DomainResult<()> {
        self.entries.lock().unwrap().insert(
            (subject.to_string(), purpose),
            StoredEntry {
                digest: digest_code(code),
                expires_at,
                consumed: false,
                payload,
            },
        );
        Ok(())
    }

    async fn try_consume(
        &self,
        subject: &str,
        purpose: CodePurpose,
        code: &str,
    ) -> DomainResult<ConsumeOutcome> {
        let mut entries = self.entries.lock().unwrap();
        let key = (subject.to_string(), purpose);
        let Some(entry) = entries.get_mut(&key) else {
            return Ok(ConsumeOutcome::NotFound);
        };
        if Utc::now() >= entry.expires_at {
            entries.remove(&key);
            return Ok(ConsumeOutcome::Expired);
        }
        if entry.consumed {
            return Ok(ConsumeOutcome::AlreadyConsumed);
        }
        if entry.digest != digest_code(code) {
            return Ok(ConsumeOutcome::Mismatch);
        }
        entry.consumed = true;
        Ok(ConsumeOutcome::Consumed {
            payload: entry.payload.clone(),
        })
    }

    async fn peek_expiry(
        &self,
        subject: &str,
        purpose: CodePurpose,
    ) -> DomainResult<Option<DateTime<Utc>>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(&(subject.to_string(), purpose))
            .filter(|e| !e.consumed && Utc::now() < e.expires_at)
            .map(|e| e.expires_at))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    /// Six-digit code from the most recent email body sent to `to`.
    fn last_code_to(&self, to: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(recipient, _)| recipient == to)
            .and_then(|(_, body)| first_six_digit_run(body))
    }
}

fn first_six_digit_run(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut start = None;
    for (i, b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            let s = *start.get_or_insert(i);
            if i - s + 1 == 6 {
                return Some(text[s..=i].to_string());
            }
        } else {
            start = None;
        }
    }
    None
}

#[async_trait]
impl EmailNotifier for RecordingNotifier {
    async fn send(&self, to: &str, _subject: &str, body_html: &str) -> Result<String, String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((to.to_string(), body_html.to_string()));
        Ok(format!("test-message-{}", sent.len()))
    }
}

struct FakeCredentials {
    user_id: String,
    email: String,
    password: Mutex<String>,
}

#[async_trait]
impl CredentialStore for FakeCredentials {
    async fn verify(&self, user_id: &str, credential: &str) -> Result<bool, String> {
        Ok(user_id == self.user_id && *self.password.lock().unwrap() == credential)
    }

    async fn apply(&self, user_id: &str, new_credential: &str) -> Result<(), String> {
        if user_id != self.user_id {
            return Err("unknown user".to_string());
        }
        *self.password.lock().unwrap() = new_credential.to_string();
        Ok(())
    }

    async fn contact_address(&self, user_id: &str) -> Result<String, String> {
        if user_id != self.user_id {
            return Err("unknown user".to_string());
        }
        Ok(self.email.clone())
    }
}

struct TestHarness {
    notifier: Arc<RecordingNotifier>,
    state: web::Data<AppState<InMemoryCodeStore, RecordingNotifier, FakeCredentials>>,
}

fn harness() -> TestHarness {
    let store = Arc::new(InMemoryCodeStore::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let credentials = Arc::new(FakeCredentials {
        user_id: "user-1".to_string(),
        email: "user@example.com".to_string(),
        password: Mutex::new("old-password".to_string()),
    });

    let verification = Arc::new(VerificationService::new(
        store,
        notifier.clone(),
        credentials,
        VerificationConfig::default(),
    ));

    TestHarness {
        notifier,
        state: web::Data::new(AppState { verification }),
    }
}

#[actix_web::test]
async fn otp_round_trip_verifies_once_then_rejects_replay() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone(), &[])).await;

    let req = test::TestRequest::post()
        .uri("/otp/send")
        .set_json(serde_json::json!({ "email": "user@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let code = h.notifier.last_code_to("user@example.com").unwrap();

    let req = test::TestRequest::post()
        .uri("/otp/verify")
        .set_json(serde_json::json!({ "email": "user@example.com", "otp": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["verified"], true);

    // Replaying the spent code gets the same 400 as a wrong code.
    let req = test::TestRequest::post()
        .uri("/otp/verify")
        .set_json(serde_json::json!({ "email": "user@example.com", "otp": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_code");
}

#[actix_web::test]
async fn malformed_email_is_rejected_with_field_details() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone(), &[])).await;

    let req = test::TestRequest::post()
        .uri("/otp/send")
        .set_json(serde_json::json!({ "email": "not-an-email" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
    assert!(body["details"]["email"].is_array());
}

#[actix_web::test]
async fn non_numeric_code_never_reaches_the_store() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone(), &[])).await;

    let req = test::TestRequest::post()
        .uri("/otp/verify")
        .set_json(serde_json::json!({ "email": "user@example.com", "otp": "12a456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}

#[actix_web::test]
async fn password_change_applies_only_after_code_confirmation() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone(), &[])).await;

    let req = test::TestRequest::post()
        .uri("/password/change")
        .set_json(serde_json::json!({
            "user_id": "user-1",
            "current_password": "old-password",
            "new_password": "new-password",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let code = h.notifier.last_code_to("user@example.com").unwrap();

    let req = test::TestRequest::post()
        .uri("/password/verify")
        .set_json(serde_json::json!({ "user_id": "user-1", "code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // The staged password is now live: a second change authenticates with
    // the new one and rejects the old one.
    let req = test::TestRequest::post()
        .uri("/password/change")
        .set_json(serde_json::json!({
            "user_id": "user-1",
            "current_password": "old-password",
            "new_password": "whatever",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_credentials");

    let req = test::TestRequest::post()
        .uri("/password/change")
        .set_json(serde_json::json!({
            "user_id": "user-1",
            "current_password": "new-password",
            "new_password": "another-password",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn wrong_current_password_issues_no_code() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone(), &[])).await;

    let req = test::TestRequest::post()
        .uri("/password/change")
        .set_json(serde_json::json!({
            "user_id": "user-1",
            "current_password": "guess",
            "new_password": "new-password",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    assert!(h.notifier.last_code_to("user@example.com").is_none());
}

#[actix_web::test]
async fn health_endpoint_and_unknown_routes() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone(), &[])).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");

    let req = test::TestRequest::get().uri("/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
