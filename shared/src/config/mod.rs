//! Configuration modules for the TaskBay backend.
//!
//! Each config struct provides a `Default` for local development and a
//! `from_env()` constructor that reads environment variables, so the process
//! bootstrap owns all external-client lifecycles.

pub mod auth_backend;
pub mod cache;
pub mod email;
pub mod server;

pub use auth_backend::AuthBackendConfig;
pub use cache::CacheConfig;
pub use email::EmailConfig;
pub use server::ServerConfig;
