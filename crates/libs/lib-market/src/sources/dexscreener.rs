//! # DexScreener Price Source
//!
//! DexScreener reports trading pairs rather than tokens. Each pair whose base
//! token was requested yields one quote, so a token traded in several pools is
//! quoted several times and weighs accordingly in the mean.

use super::{usable_price, PriceSource, SourceId};
use crate::clock::Clock;
use crate::error::Result;
use crate::http::send_json;
use async_trait::async_trait;
use lib_core::dto::PriceQuote;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

const SERVICE: &str = "dexscreener";

#[derive(Debug, Deserialize)]
pub struct TokenPairsResponse {
    #[serde(default)]
    pub pairs: Option<Vec<DexPair>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPair {
    pub base_token: Option<PairToken>,
    /// Decimal string, e.g. `"145.21"`.
    pub price_usd: Option<String>,
    pub liquidity: Option<PairLiquidity>,
    pub volume: Option<PairVolume>,
}

#[derive(Debug, Deserialize)]
pub struct PairToken {
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PairLiquidity {
    pub usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PairVolume {
    pub h24: Option<f64>,
}

pub struct DexScreenerSource {
    http: Client,
    api_base: String,
    clock: Arc<dyn Clock>,
}

impl DexScreenerSource {
    pub fn new(http: Client, api_base: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            clock,
        }
    }

    pub fn map_response(
        tokens: &[String],
        response: TokenPairsResponse,
        timestamp: i64,
    ) -> Vec<PriceQuote> {
        let requested: HashSet<&str> = tokens.iter().map(String::as_str).collect();

        response
            .pairs
            .unwrap_or_default()
            .into_iter()
            .filter_map(|pair| {
                let address = pair.base_token?.address?;
                if !requested.contains(address.as_str()) {
                    return None;
                }
                let price = pair
                    .price_usd
                    .as_deref()
                    .and_then(|p| p.trim().parse::<f64>().ok())
                    .and_then(usable_price)?;
                Some(
                    PriceQuote::new(address, price, timestamp, SERVICE).with_market_data(
                        pair.liquidity.and_then(|l| l.usd),
                        pair.volume.and_then(|v| v.h24),
                    ),
                )
            })
            .collect()
    }
}

#[async_trait]
impl PriceSource for DexScreenerSource {
    fn id(&self) -> SourceId {
        SourceId::DexScreener
    }

    async fn fetch_quotes(&self, tokens: &[String]) -> Result<Vec<PriceQuote>> {
        let url = format!("{}/tokens/{}", self.api_base, tokens.join(","));
        let response: TokenPairsResponse = send_json(SERVICE, self.http.get(&url)).await?;
        Ok(Self::map_response(tokens, response, self.clock.now_millis()))
    }
}
