//! # Birdeye Price Source
//!
//! Batch prices from Birdeye's `multi_price` endpoint. Birdeye also reports
//! liquidity and 24h volume, which are carried on the quote.

use super::{usable_price, PriceSource, SourceId};
use crate::clock::Clock;
use crate::error::{MarketError, Result};
use crate::http::send_json;
use async_trait::async_trait;
use lib_core::dto::PriceQuote;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

const SERVICE: &str = "birdeye";

#[derive(Debug, Deserialize)]
pub struct MultiPriceResponse {
    #[serde(default)]
    pub data: HashMap<String, Option<BirdeyePrice>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirdeyePrice {
    pub value: Option<f64>,
    pub liquidity: Option<f64>,
    pub volume24h: Option<f64>,
}

pub struct BirdeyeSource {
    http: Client,
    api_base: String,
    api_key: Option<String>,
    clock: Arc<dyn Clock>,
}

impl BirdeyeSource {
    pub fn new(
        http: Client,
        api_base: impl Into<String>,
        api_key: Option<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            api_key,
            clock,
        }
    }

    /// Quotes for the requested tokens only; other addresses in `data` are ignored.
    pub fn map_response(
        tokens: &[String],
        response: MultiPriceResponse,
        timestamp: i64,
    ) -> Vec<PriceQuote> {
        let requested: HashSet<&str> = tokens.iter().map(String::as_str).collect();

        let mut quotes: Vec<PriceQuote> = response
            .data
            .into_iter()
            .filter(|(address, _)| requested.contains(address.as_str()))
            .filter_map(|(address, entry)| {
                let entry = entry?;
                let price = entry.value.and_then(usable_price)?;
                Some(
                    PriceQuote::new(address, price, timestamp, SERVICE)
                        .with_market_data(entry.liquidity, entry.volume24h),
                )
            })
            .collect();
        // HashMap order is arbitrary; keep output deterministic.
        quotes.sort_by(|a, b| a.token.cmp(&b.token));
        quotes
    }
}

#[async_trait]
impl PriceSource for BirdeyeSource {
    fn id(&self) -> SourceId {
        SourceId::Birdeye
    }

    async fn fetch_quotes(&self, tokens: &[String]) -> Result<Vec<PriceQuote>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(MarketError::MissingApiKey(SERVICE))?;

        let url = format!("{}/defi/multi_price", self.api_base);
        let request = self
            .http
            .get(&url)
            .query(&[("list_address", tokens.join(","))])
            .header("X-API-KEY", api_key)
            .header("x-chain", "solana");

        let response: MultiPriceResponse = send_json(SERVICE, request).await?;
        Ok(Self::map_response(tokens, response, self.clock.now_millis()))
    }
}
