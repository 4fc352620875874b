//! # Market State
//!
//! Wires the price sources, the aggregator and the token registry cache from
//! [`Config`] into one cloneable container shared with the HTTP layer.
//!
//! ```text
//! ┌─────────────────┐
//! │  MarketState    │
//! └────────┬────────┘
//!          ├─► PriceAggregator     (coingecko, birdeye, jupiter, dexscreener)
//!          └─► TokenRegistryCache  (jupiter token list → solana token list)
//! ```

use crate::aggregator::PriceAggregator;
use crate::cache::TokenRegistryCache;
use crate::clock::{Clock, SystemClock};
use crate::http::HttpClientBuilder;
use crate::registry::{JupiterTokenList, SolanaTokenList, TokenRegistry};
use crate::sources::{BirdeyeSource, CoinGeckoSource, DexScreenerSource, JupiterPriceSource, PriceSource};
use lib_core::Config;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct MarketState {
    pub aggregator: Arc<PriceAggregator>,
    pub tokens: Arc<TokenRegistryCache>,
}

impl MarketState {
    pub fn new(aggregator: Arc<PriceAggregator>, tokens: Arc<TokenRegistryCache>) -> Self {
        Self { aggregator, tokens }
    }

    /// Build every adapter against the system clock and one shared HTTP client.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = HttpClientBuilder::default()
            .timeout(config.http_timeout())
            .build()?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        if config.birdeye_api_key.is_none() {
            warn!("BIRDEYE_API_KEY not set, Birdeye quotes will be skipped");
        }

        let sources: Vec<Arc<dyn PriceSource>> = vec![
            Arc::new(CoinGeckoSource::new(
                http.clone(),
                &config.coingecko_api_base,
                clock.clone(),
            )),
            Arc::new(BirdeyeSource::new(
                http.clone(),
                &config.birdeye_api_base,
                config.birdeye_api_key.clone(),
                clock.clone(),
            )),
            Arc::new(JupiterPriceSource::new(
                http.clone(),
                &config.jupiter_price_api_base,
                clock.clone(),
            )),
            Arc::new(DexScreenerSource::new(
                http.clone(),
                &config.dexscreener_api_base,
                clock.clone(),
            )),
        ];
        let aggregator = PriceAggregator::new(sources, clock.clone())
            .with_source_timeout(config.price_source_timeout());
        info!(
            "Price aggregator ready ({} sources, {}ms timeout)",
            aggregator.source_ids().len(),
            config.price_source_timeout_ms
        );

        let primary: Arc<dyn TokenRegistry> =
            Arc::new(JupiterTokenList::new(http.clone(), &config.token_list_primary_url));
        let fallback: Arc<dyn TokenRegistry> =
            Arc::new(SolanaTokenList::new(http, &config.token_list_fallback_url));
        let tokens = TokenRegistryCache::new(primary, fallback, clock)
            .with_ttl(config.token_cache_ttl())
            .with_serve_stale(config.token_cache_serve_stale);
        info!(
            "Token registry cache ready (ttl {}s, serve stale: {})",
            config.token_cache_ttl_secs, config.token_cache_serve_stale
        );

        Ok(Self::new(Arc::new(aggregator), Arc::new(tokens)))
    }
}
