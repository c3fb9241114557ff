//! Planner-level errors
//!
//! Source adapters never surface these; they report [`crate::sources::SourceError`]
//! which the aggregator swallows. `PlannerError` covers what sits around the
//! aggregation core: configuration, query validation and the offers client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    /// Missing credentials, unreadable config, client construction
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Offers provider failed or returned nothing usable
    #[error("API error: {message}")]
    Api { message: String },

    /// Rejected query or request input
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl PlannerError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Message safe to hand back to HTTP clients. Config details stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Config { .. } => {
                "Travel planner is not configured for this request".to_string()
            }
            PlannerError::Api { message } => {
                format!("Travel data provider unavailable: {message}")
            }
            PlannerError::Validation { message } => format!("Invalid input: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PlannerError::config("Amadeus credentials missing"), "not configured")]
    #[case(PlannerError::api("No flights found for DEL to GOI"), "No flights found")]
    #[case(PlannerError::validation("destination must not be empty"), "must not be empty")]
    fn test_user_messages(#[case] err: PlannerError, #[case] expected: &str) {
        assert!(err.user_message().contains(expected));
    }

    #[test]
    fn test_config_details_are_not_exposed() {
        let err = PlannerError::config("AMADEUS_API_SECRET=abc123");
        assert!(err.to_string().contains("abc123"));
        assert!(!err.user_message().contains("abc123"));
    }
}
