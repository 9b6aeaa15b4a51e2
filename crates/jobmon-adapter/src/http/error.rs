/*
[INPUT]:  Error sources (transport, HTTP status, serialization, configuration)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Jobmon adapter
#[derive(Error, Debug)]
pub enum JobmonError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server-side failure; worth retrying
    #[error("Request failed due to status code {status} from GET request through route {route}. Response content: {content}")]
    InvalidResponse {
        status: u16,
        route: String,
        content: String,
    },

    /// Client-side failure; retrying will not help
    #[error("Client error with status code {status} from GET request through route {route}. Response content: {content}")]
    InvalidRequest {
        status: u16,
        route: String,
        content: String,
    },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Retry policy gave up
    #[error("Exceeded HTTP request retry budget after {attempts} attempts: {source}")]
    RetryBudgetExceeded {
        attempts: u32,
        #[source]
        source: Box<JobmonError>,
    },
}

impl JobmonError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            JobmonError::Http(_) | JobmonError::InvalidResponse { .. }
        )
    }

    /// HTTP status attached to the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            JobmonError::InvalidResponse { status, .. }
            | JobmonError::InvalidRequest { status, .. } => Some(*status),
            JobmonError::Http(err) => err.status().map(|status| status.as_u16()),
            JobmonError::RetryBudgetExceeded { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Classify a non-success status into the matching error variant.
    ///
    /// Returns `None` for statuses the service treats as success.
    pub fn from_status(
        status: StatusCode,
        route: impl Into<String>,
        content: impl Into<String>,
    ) -> Option<Self> {
        if status.is_server_error() || status == StatusCode::LOCKED {
            return Some(JobmonError::InvalidResponse {
                status: status.as_u16(),
                route: route.into(),
                content: content.into(),
            });
        }
        if status.is_client_error() {
            return Some(JobmonError::InvalidRequest {
                status: status.as_u16(),
                route: route.into(),
                content: content.into(),
            });
        }
        None
    }
}

/// Result type alias for Jobmon operations
pub type Result<T> = std::result::Result<T, JobmonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retryable() {
        let err = JobmonError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "/x", "boom")
            .expect("500 is an error");
        assert!(err.is_retryable());
        assert_eq!(err.status(), Some(500));

        let locked = JobmonError::from_status(StatusCode::LOCKED, "/x", "")
            .expect("423 is an error");
        assert!(matches!(locked, JobmonError::InvalidResponse { status: 423, .. }));
        assert!(locked.is_retryable());
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        let err = JobmonError::from_status(StatusCode::NOT_FOUND, "/x", "missing")
            .expect("404 is an error");
        assert!(matches!(err, JobmonError::InvalidRequest { status: 404, .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_success_statuses_are_not_errors() {
        assert!(JobmonError::from_status(StatusCode::OK, "/x", "").is_none());
        assert!(JobmonError::from_status(StatusCode::TEMPORARY_REDIRECT, "/x", "").is_none());
    }

    #[test]
    fn test_budget_error_keeps_inner_status() {
        let inner = JobmonError::from_status(StatusCode::BAD_GATEWAY, "/x", "")
            .expect("502 is an error");
        let err = JobmonError::RetryBudgetExceeded {
            attempts: 3,
            source: Box::new(inner),
        };
        assert_eq!(err.status(), Some(502));
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("after 3 attempts"));
    }
}
