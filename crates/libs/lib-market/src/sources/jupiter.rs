//! # Jupiter Price Source
//!
//! Batch prices from the Jupiter price API (`/price?ids=<mint,...>`).

use super::{usable_price, PriceSource, SourceId};
use crate::clock::Clock;
use crate::error::Result;
use crate::http::send_json;
use async_trait::async_trait;
use lib_core::dto::PriceQuote;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const SERVICE: &str = "jupiter";

/// Response from Jupiter price API
#[derive(Debug, Deserialize)]
pub struct JupiterPriceResponse {
    #[serde(default)]
    pub data: HashMap<String, Option<JupiterPriceData>>,
}

/// Price data for a single token
#[derive(Debug, Clone, Deserialize)]
pub struct JupiterPriceData {
    pub id: Option<String>,
    #[serde(rename = "mintSymbol")]
    pub mint_symbol: Option<String>,
    pub price: Option<f64>,
}

pub struct JupiterPriceSource {
    http: Client,
    price_api_base: String,
    clock: Arc<dyn Clock>,
}

impl JupiterPriceSource {
    pub fn new(http: Client, price_api_base: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            price_api_base: price_api_base.into(),
            clock,
        }
    }

    /// Keep request order; Jupiter keys `data` by the id we sent.
    pub fn map_response(
        tokens: &[String],
        response: &JupiterPriceResponse,
        timestamp: i64,
    ) -> Vec<PriceQuote> {
        tokens
            .iter()
            .filter_map(|mint| {
                let data = response.data.get(mint)?.as_ref()?;
                let price = data.price.and_then(usable_price)?;
                Some(PriceQuote::new(mint.clone(), price, timestamp, SERVICE))
            })
            .collect()
    }
}

#[async_trait]
impl PriceSource for JupiterPriceSource {
    fn id(&self) -> SourceId {
        SourceId::Jupiter
    }

    async fn fetch_quotes(&self, tokens: &[String]) -> Result<Vec<PriceQuote>> {
        let url = format!("{}/price", self.price_api_base);

        debug!("Fetching Jupiter prices for {} tokens", tokens.len());

        let request = self.http.get(&url).query(&[("ids", tokens.join(","))]);
        let response: JupiterPriceResponse = send_json(SERVICE, request).await?;

        let quotes = Self::map_response(tokens, &response, self.clock.now_millis());
        debug!("Jupiter returned {} prices", quotes.len());
        Ok(quotes)
    }
}
