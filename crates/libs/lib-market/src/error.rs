//! # Market Integration Errors
//!
//! Errors raised by price source and token registry adapters. None of these
//! reach HTTP clients: the aggregator and the registry cache log them and turn
//! them into empty results.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarketError>;

#[derive(Debug, Error)]
pub enum MarketError {
    /// Transport failure or undecodable body.
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{service} returned HTTP {status}")]
    Status {
        service: &'static str,
        status: StatusCode,
    },

    #[error("{0} requires an API key")]
    MissingApiKey(&'static str),

    #[error("{service} did not answer within {after_ms}ms")]
    Timeout {
        service: &'static str,
        after_ms: u128,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl MarketError {
    pub fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| MarketError::Http { service, source }
    }
}
