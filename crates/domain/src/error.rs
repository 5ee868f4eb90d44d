//! Domain error type.

use thiserror::Error;

/// Errors surfaced by domain services.
///
/// None of these are retried internally; the same input yields the same
/// failure.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Location ({latitude}, {longitude}) is outside the {region} service area")]
    OutOfRegion {
        region: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
