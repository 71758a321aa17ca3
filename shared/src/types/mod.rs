//! Common API types shared between layers.

pub mod response;

pub use response::{ErrorResponse, MessageResponse};
