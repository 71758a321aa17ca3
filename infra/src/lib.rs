//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborator interfaces declared in
//! `tb_core`:
//!
//! - **Cache**: Redis client and the Redis-backed [`cache::RedisCodeStore`]
//! - **Email**: HTTP email delivery and a console mock
//! - **Auth backend**: credential verify/apply against the hosted auth API

use thiserror::Error;

pub mod auth_backend;
pub mod cache;
pub mod email;

/// Infrastructure-level errors, wrapped into `DomainError` at the trait
/// boundaries.
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Cache operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
