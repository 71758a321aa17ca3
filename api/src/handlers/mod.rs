//! Error-to-HTTP mapping.

pub mod error;
