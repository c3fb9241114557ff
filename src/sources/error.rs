use std::time::Duration;

use thiserror::Error;

/// Longest upstream body excerpt kept in an error message
const BODY_EXCERPT_LEN: usize = 200;

/// Why a single data source produced no data.
///
/// These never cross the aggregator boundary; a failed source is logged and
/// simply left out of the aggregate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("{0} not configured")]
    MissingCredential(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),

    #[error("Upstream API error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("No results: {0}")]
    NoResults(String),

    #[error("Source task panicked: {0}")]
    Panicked(String),
}

impl SourceError {
    /// Build an upstream error, keeping only the start of the response body
    pub fn upstream(status: u16, body: &str) -> Self {
        let message: String = body.chars().take(BODY_EXCERPT_LEN).collect();
        SourceError::Upstream { status, message }
    }

    /// Classify a failed send, reporting a per-request timeout as [`SourceError::Timeout`]
    pub fn request(err: reqwest_middleware::Error, timeout: Duration) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(err) if err.is_timeout() => {
                SourceError::Timeout(timeout.as_secs())
            }
            other => other.into(),
        }
    }
}

// Request URLs carry API keys as query parameters, so they never reach the message
impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_decode() {
            SourceError::InvalidPayload(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for SourceError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(err) => err.without_url().into(),
            reqwest_middleware::Error::Middleware(err) => SourceError::Network(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_body_is_truncated() {
        let body = "x".repeat(1000);
        let SourceError::Upstream { status, message } = SourceError::upstream(503, &body) else {
            panic!("expected upstream error");
        };
        assert_eq!(status, 503);
        assert_eq!(message.len(), 200);
    }

    #[test]
    fn test_messages_carry_status() {
        let err = SourceError::upstream(401, "Invalid ApiKey");
        assert_eq!(err.to_string(), "Upstream API error 401: Invalid ApiKey");

        let err = SourceError::MissingCredential("OpenWeatherMap API key".to_string());
        assert_eq!(err.to_string(), "OpenWeatherMap API key not configured");
    }
}
