//! Shared outbound HTTP client

use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::PlannerError;

const USER_AGENT: &str = concat!("TravelPlanner/", env!("CARGO_PKG_VERSION"));

/// Build the process-wide reqwest client. Clones share one connection pool.
pub fn build_client() -> crate::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| PlannerError::config(format!("Failed to create HTTP client: {e}")))
}

/// Client for data-source calls. No retries: a failed source is simply dropped.
#[must_use]
pub fn source_client(client: reqwest::Client) -> ClientWithMiddleware {
    ClientBuilder::new(client).build()
}

/// Client for one-off user-triggered lookups, retrying transient failures
#[must_use]
pub fn retrying_client(client: reqwest::Client, max_retries: u32) -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
    ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}
