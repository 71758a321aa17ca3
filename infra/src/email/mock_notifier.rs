//! Mock email notifier for development and tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::info;

use tb_core::domain::entities::verification_code::mask_subject;
use tb_core::services::verification::EmailNotifier;

/// Records sends instead of delivering them. The full body is only ever
/// written to the process log, which is acceptable in development.
#[derive(Default)]
pub struct MockEmailNotifier {
    sent: Mutex<Vec<(String, String)>>,
    counter: AtomicU64,
}

impl MockEmailNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sends recorded so far
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Subject line of the most recent send to `to`, if any
    pub fn last_subject_to(&self, to: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(recipient, _)| recipient == to)
            .map(|(_, subject)| subject.clone())
    }
}

#[async_trait]
impl EmailNotifier for MockEmailNotifier {
    async fn send(&self, to: &str, subject: &str, body_html: &str) -> Result<String, String> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        info!(
            to = mask_subject(to),
            subject = subject,
            body = body_html,
            "MOCK EMAIL (not delivered)"
        );
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string()));
        Ok(format!("mock-email-{}", id))
    }
}
