//! HTTP surface for the TaskBay verification subsystem.
//!
//! Thin by design: handlers validate the request shape, delegate to
//! `tb_core` services and map domain errors onto HTTP statuses. No
//! verification logic lives in this crate.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
