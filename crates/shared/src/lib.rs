//! Shared utilities for the health tracker backend.
//!
//! - Great-circle distance, bounding boxes and service regions
//! - Password hashing with Argon2id
//! - Field validators used by request DTOs

pub mod geo;
pub mod password;
pub mod validation;
