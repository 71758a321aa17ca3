//! # TaskBay Shared
//!
//! Configuration and common API types shared across the TaskBay backend
//! crates. Nothing in here contains business logic; it is the glue that the
//! api, core and infra layers agree on.

pub mod config;
pub mod types;
