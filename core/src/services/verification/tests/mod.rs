//! Unit tests for the verification subsystem.
