//! # HTTP Client
//!
//! Shared reqwest client construction and the JSON GET helper every adapter uses.

use crate::error::{MarketError, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Builder for the shared HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: concat!("xforce-market-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpClientBuilder {
    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()
            .map_err(|e| MarketError::Client(e.to_string()))
    }
}

/// Send `request` and decode a JSON body, mapping failures to [`MarketError`].
pub async fn send_json<T: DeserializeOwned>(service: &'static str, request: RequestBuilder) -> Result<T> {
    let response = request.send().await.map_err(MarketError::http(service))?;

    let status = response.status();
    if !status.is_success() {
        return Err(MarketError::Status { service, status });
    }

    debug!(service, status = status.as_u16(), "Upstream responded");

    response.json::<T>().await.map_err(MarketError::http(service))
}
