//! Request and response DTOs.

pub mod verification;

pub use verification::*;
