//! # TaskBay Core
//!
//! Core business logic and domain layer for the TaskBay backend.
//! This crate contains the verification-code domain entity, the
//! verification services, collaborator trait interfaces, and error types.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
