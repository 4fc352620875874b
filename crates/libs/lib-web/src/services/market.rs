//! # Market Service
//!
//! Request-level logic between the HTTP handlers and `lib-market`: query
//! parsing, validation, and mapping empty lookups to [`AppError`].
//!
//! ```text
//! MarketService → PriceAggregator    → (coingecko, birdeye, jupiter, dexscreener)
//!              → TokenRegistryCache → (jupiter token list → solana token list)
//! ```

use lib_core::dto::{PriceQuote, Token, TokenFilter};
use lib_core::{AppError, Result};
use lib_market::{MarketState, SourceId};
use lib_utils::{parse_csv, validate_not_empty};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct MarketService {
    market: Arc<MarketState>,
}

impl MarketService {
    pub fn new(market: Arc<MarketState>) -> Self {
        Self { market }
    }

    /// Aggregated prices for a comma-separated token list.
    ///
    /// `sources` narrows the fan-out; unknown names are skipped. When names
    /// were given but none is known, no source is queried.
    ///
    /// # Errors
    ///
    /// `AppError::InvalidInput` when `tokens` holds no token.
    #[instrument(skip(self))]
    pub async fn get_prices(&self, tokens: Option<&str>, sources: Option<&str>) -> Result<Vec<PriceQuote>> {
        let tokens = parse_csv(tokens);
        if tokens.is_empty() {
            return Err(AppError::InvalidInput("No tokens specified".to_string()));
        }

        let requested = parse_csv(sources);
        let source_ids = parse_source_ids(&requested);
        if !requested.is_empty() && source_ids.is_empty() {
            warn!("[MARKET] None of the requested sources is known: {:?}", requested);
            return Ok(Vec::new());
        }

        let quotes = self.market.aggregator.get_prices(&tokens, &source_ids).await;
        debug!("[MARKET] {} of {} tokens priced", quotes.len(), tokens.len());
        Ok(quotes)
    }

    /// Aggregated price for one token, or the `unknown` sentinel.
    pub async fn get_price(&self, token: &str) -> Result<PriceQuote> {
        validate_not_empty(token, "token").map_err(AppError::InvalidInput)?;
        Ok(self.market.aggregator.get_price_for_token(token).await)
    }

    pub async fn get_tokens(&self, filter: &TokenFilter) -> Vec<Token> {
        self.market.tokens.get_tokens(filter).await
    }

    /// # Errors
    ///
    /// `AppError::InvalidInput` when `query` is missing or blank.
    pub async fn search_tokens(&self, query: Option<&str>) -> Result<Vec<Token>> {
        let query = query.map(str::trim).unwrap_or_default();
        validate_not_empty(query, "q").map_err(AppError::InvalidInput)?;
        Ok(self.market.tokens.search_tokens(query).await)
    }

    /// # Errors
    ///
    /// `AppError::NotFound` when no token has this exact address.
    pub async fn get_token(&self, address: &str) -> Result<Token> {
        self.market
            .tokens
            .get_token_by_address(address)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Token {} not found", address)))
    }
}

/// Known source ids in request order; unknown names are logged and dropped.
fn parse_source_ids(names: &[String]) -> Vec<SourceId> {
    names
        .iter()
        .filter_map(|name| match name.parse::<SourceId>() {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("[MARKET] {}", e);
                None
            }
        })
        .collect()
}
