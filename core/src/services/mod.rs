//! Business services.

pub mod verification;

pub use verification::*;
