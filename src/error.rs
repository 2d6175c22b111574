//! Error types
//!
//! `ServiceError` covers failures of the external collaborators (record
//! store, catalog, notification dispatcher). `HubError` is what the wizard
//! and the CLI surface to callers.

use thiserror::Error;

/// Failure talking to an external collaborator
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The collaborator is not reachable or refused the operation
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum HubError {
    /// A step-declared required field is empty
    #[error("Validation error: {0}")]
    Validation(String),

    /// The primary signup record could not be written
    #[error("Signup could not be saved: {0}")]
    PrimaryWrite(#[source] ServiceError),
}

impl HubError {
    /// Short machine-readable tag, used as a structured logging field
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::PrimaryWrite(_) => "primary_write",
        }
    }
}

/// Result alias for collaborator calls
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Result alias for application operations
pub type Result<T> = std::result::Result<T, HubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ServiceError::Status {
            status: 503,
            body: "upstream down".to_string(),
        };
        assert_eq!(err.to_string(), "service returned 503: upstream down");
    }

    #[test]
    fn test_primary_write_keeps_source() {
        use std::error::Error as _;

        let err = HubError::PrimaryWrite(ServiceError::Unavailable("offline".to_string()));
        assert_eq!(err.code(), "primary_write");
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("service unavailable: offline"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = HubError::Validation("display name is required".to_string());
        assert_eq!(err.code(), "validation");
        assert_eq!(err.to_string(), "Validation error: display name is required");
    }
}
