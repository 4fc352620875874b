//! # Price Aggregator
//!
//! Fans a price request out to every selected [`PriceSource`] concurrently and
//! merges the answers into one consensus quote per token.
//!
//! ## Failure model
//!
//! Each source runs inside its own timeout. A source that errors or times out
//! is logged and contributes an empty result; nothing is propagated to the
//! caller. When every source fails the result is simply empty.
//!
//! ## Merge
//!
//! Quotes are grouped by token in first-seen order. The merged price is the
//! unweighted arithmetic mean of all quotes for the token, stamped with the
//! merge instant and `source = "aggregated"`. Tokens nobody could price are
//! left out.
//!
//! ```text
//! get_prices(tokens) ─┬─► coingecko  ─┐
//!                     ├─► birdeye    ─┤  join_all (each bounded by timeout)
//!                     ├─► jupiter    ─┤
//!                     └─► dexscreener ┘─► merge ─► Vec<PriceQuote>
//! ```

use crate::clock::Clock;
use crate::error::MarketError;
use crate::sources::{PriceSource, SourceId};
use futures_util::future::join_all;
use lib_core::dto::{PriceQuote, SOURCE_AGGREGATED};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default upper bound for one source query.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct PriceAggregator {
    sources: Vec<Arc<dyn PriceSource>>,
    source_timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl PriceAggregator {
    pub fn new(sources: Vec<Arc<dyn PriceSource>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sources,
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
            clock,
        }
    }

    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    /// Ids of the configured sources, in fan-out order.
    pub fn source_ids(&self) -> Vec<SourceId> {
        self.sources.iter().map(|s| s.id()).collect()
    }

    /// Aggregate prices for `tokens` from `sources` (all configured sources
    /// when `sources` is empty).
    #[instrument(skip(self), fields(token_count = tokens.len()))]
    pub async fn get_prices(&self, tokens: &[String], sources: &[SourceId]) -> Vec<PriceQuote> {
        if tokens.is_empty() {
            return Vec::new();
        }

        // Sources that echo the request back would quote a repeated token twice.
        let mut seen = HashSet::with_capacity(tokens.len());
        let tokens: Vec<String> = tokens
            .iter()
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect();

        let selected: Vec<&Arc<dyn PriceSource>> = self
            .sources
            .iter()
            .filter(|s| sources.is_empty() || sources.contains(&s.id()))
            .collect();

        debug!(
            sources = ?selected.iter().map(|s| s.id()).collect::<Vec<_>>(),
            "Querying price sources"
        );

        let results = join_all(selected.into_iter().map(|source| self.query_source(source, &tokens))).await;
        let quotes: Vec<PriceQuote> = results.into_iter().flatten().collect();

        let merged = merge_quotes(quotes, self.clock.now_millis());
        info!("Aggregated {} of {} requested prices", merged.len(), tokens.len());
        merged
    }

    /// Price one token, falling back to the `"unknown"` sentinel when no source
    /// could price it.
    pub async fn get_price_for_token(&self, token: &str) -> PriceQuote {
        let tokens = [token.to_string()];
        self.get_prices(&tokens, &[])
            .await
            .into_iter()
            .next()
            .unwrap_or_else(|| {
                debug!(token, "No source priced token, returning unknown sentinel");
                PriceQuote::unknown(token, self.clock.now_millis())
            })
    }

    /// Run one source query; every failure ends here as an empty result.
    async fn query_source(&self, source: &Arc<dyn PriceSource>, tokens: &[String]) -> Vec<PriceQuote> {
        let id = source.id();
        let outcome = match tokio::time::timeout(self.source_timeout, source.fetch_quotes(tokens)).await {
            Ok(result) => result,
            Err(_) => Err(MarketError::Timeout {
                service: id.as_str(),
                after_ms: self.source_timeout.as_millis(),
            }),
        };

        match outcome {
            Ok(quotes) => {
                debug!(source = %id, count = quotes.len(), "Source answered");
                quotes
            }
            Err(e) => {
                warn!(source = %id, error = %e, "Price source failed, ignoring");
                Vec::new()
            }
        }
    }
}

/// Merge quotes into one record per token using the unweighted mean.
///
/// Supplementary liquidity and volume come from the first quote for the token
/// that carried them.
pub fn merge_quotes(quotes: Vec<PriceQuote>, timestamp: i64) -> Vec<PriceQuote> {
    struct Acc {
        sum: f64,
        count: usize,
        liquidity: Option<f64>,
        volume24h: Option<f64>,
    }

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Acc> = HashMap::new();

    for quote in quotes {
        let acc = groups.entry(quote.token.clone()).or_insert_with(|| {
            order.push(quote.token.clone());
            Acc {
                sum: 0.0,
                count: 0,
                liquidity: None,
                volume24h: None,
            }
        });
        acc.sum += quote.price;
        acc.count += 1;
        acc.liquidity = acc.liquidity.or(quote.liquidity);
        acc.volume24h = acc.volume24h.or(quote.volume24h);
    }

    order
        .into_iter()
        .filter_map(|token| {
            let acc = groups.remove(&token)?;
            Some(
                PriceQuote::new(token, acc.sum / acc.count as f64, timestamp, SOURCE_AGGREGATED)
                    .with_market_data(acc.liquidity, acc.volume24h),
            )
        })
        .collect()
}
