//! Email delivery module.
//!
//! Implementations of the core `EmailNotifier` trait: an HTTP JSON client
//! for a hosted email API and a console mock for development and tests.
//! Delivery is best effort everywhere; callers decide what a failed send
//! means for their flow.

pub mod http_notifier;
pub mod mock_notifier;

pub use http_notifier::HttpEmailNotifier;
pub use mock_notifier::MockEmailNotifier;

use tb_core::services::verification::EmailNotifier;
use tb_shared::config::EmailConfig;

/// Create an email notifier based on configuration.
///
/// Unknown providers and misconfigured HTTP clients fall back to the mock
/// so a development environment boots without credentials.
pub fn create_email_notifier(config: &EmailConfig) -> Box<dyn EmailNotifier> {
    match config.provider.as_str() {
        "mock" => Box::new(MockEmailNotifier::new()),
        "http" => match HttpEmailNotifier::new(config.clone()) {
            Ok(service) => Box::new(service),
            Err(e) => {
                tracing::error!("Failed to initialize HTTP email notifier: {}", e);
                tracing::warn!("Falling back to mock email notifier");
                Box::new(MockEmailNotifier::new())
            }
        },
        other => {
            tracing::warn!("Unknown email provider '{}', using mock implementation", other);
            Box::new(MockEmailNotifier::new())
        }
    }
}
