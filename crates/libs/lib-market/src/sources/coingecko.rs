//! # CoinGecko Price Source
//!
//! CoinGecko prices coins, not mints, so only tokens with a known coin id can
//! be quoted. Everything else is skipped without a request.

use super::{
    usable_price, PriceSource, SourceId, BONK_MINT, JUP_MINT, ORCA_MINT, RAY_MINT, SOL_MINT,
    USDC_MINT, USDT_MINT, WBTC_MINT, WETH_MINT, WIF_MINT,
};
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

const SERVICE: &str = "coingecko";

/// `/simple/price` response: coin id → currency → price.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct SimplePriceResponse {
    pub prices: HashMap<String, CoinPrice>,
}

#[derive(Debug, Deserialize)]
pub struct CoinPrice {
    pub usd: Option<f64>,
}

/// Map a Solana mint to its CoinGecko coin id.
pub fn coin_id_for_mint(mint: &str) -> Option<&'static str> {
    match mint {
        SOL_MINT => Some("solana"),
        USDC_MINT => Some("usd-coin"),
        USDT_MINT => Some("tether"),
        WBTC_MINT => Some("bitcoin"),
        WETH_MINT => Some("ethereum"),
        JUP_MINT => Some("jupiter-exchange-solana"),
        RAY_MINT => Some("raydium"),
        ORCA_MINT => Some("orca"),
        BONK_MINT => Some("bonk"),
        WIF_MINT => Some("dogwifcoin"),
        _ => None,
    }
}

pub struct CoinGeckoSource {
    http: Client,
    api_base: String,
    clock: Arc<dyn Clock>,
}

impl CoinGeckoSource {
    pub fn new(http: Client, api_base: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            clock,
        }
    }

    /// Turn a `/simple/price` response into quotes for the requested mints.
    pub fn map_response(
        tokens: &[String],
        response: &SimplePriceResponse,
        timestamp: i64,
    ) -> Vec<PriceQuote> {
        tokens
            .iter()
            .filter_map(|mint| {
                let coin_id = coin_id_for_mint(mint)?;
                let price = response.prices.get(coin_id)?.usd.and_then(usable_price)?;
                Some(PriceQuote::new(mint.clone(), price, timestamp, SERVICE))
            })
            .collect()
    }
}

#[async_trait]
impl PriceSource for CoinGeckoSource {
    fn id(&self) -> SourceId {
        SourceId::CoinGecko
    }

    async fn fetch_quotes(&self, tokens: &[String]) -> Result<Vec<PriceQuote>> {
        let mut ids: Vec<&str> = tokens.iter().filter_map(|t| coin_id_for_mint(t)).collect();
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            debug!("No CoinGecko coin ids for {} tokens, skipping", tokens.len());
            return Ok(Vec::new());
        }

        let url = format!("{}/simple/price", self.api_base);
        let request = self
            .http
            .get(&url)
            .query(&[("ids", ids.join(",")), ("vs_currencies", "usd".to_string())]);

        let response: SimplePriceResponse = send_json(SERVICE, request).await?;
        Ok(Self::map_response(tokens, &response, self.clock.now_millis()))
    }
}
