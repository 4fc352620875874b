//! # Token Registry Cache
//!
//! Keeps one in-memory snapshot of the token universe, refreshed lazily once it
//! is older than the configured TTL (1h by default).
//!
//! ## Refresh
//!
//! ```text
//! stale? ─► primary registry ──ok──► replace snapshot, fetched_at = now
//!                  │ err
//!                  ▼
//!           fallback registry ──ok──► replace snapshot, fetched_at = now
//!                  │ err
//!                  ▼
//!           keep old snapshot, answer empty (or stale, when enabled)
//! ```
//!
//! The snapshot is an `Arc<Vec<Token>>` swapped in with a single assignment, so
//! readers clone the `Arc` and filter without holding the lock. Concurrent
//! stale readers may each trigger a refresh.
//!
//! `now` is read once per request, before any registry is contacted, and is
//! the instant stamped on a refreshed snapshot.

use crate::clock::Clock;
use crate::registry::TokenRegistry;
use chrono::{DateTime, Utc};
use lib_core::dto::{Token, TokenFilter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Default snapshot lifetime.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

#[derive(Clone)]
struct Snapshot {
    tokens: Arc<Vec<Token>>,
    fetched_at: DateTime<Utc>,
}

pub struct TokenRegistryCache {
    primary: Arc<dyn TokenRegistry>,
    fallback: Arc<dyn TokenRegistry>,
    ttl: Duration,
    serve_stale: bool,
    clock: Arc<dyn Clock>,
    state: RwLock<Option<Snapshot>>,
}

impl TokenRegistryCache {
    pub fn new(
        primary: Arc<dyn TokenRegistry>,
        fallback: Arc<dyn TokenRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            primary,
            fallback,
            ttl: DEFAULT_TOKEN_TTL,
            serve_stale: false,
            clock,
            state: RwLock::new(None),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Answer with the last good snapshot when both registries fail.
    pub fn with_serve_stale(mut self, serve_stale: bool) -> Self {
        self.serve_stale = serve_stale;
        self
    }

    /// Filtered, paginated view of the current token list.
    #[instrument(skip(self))]
    pub async fn get_tokens(&self, filter: &TokenFilter) -> Vec<Token> {
        let tokens = self.current().await;
        filter.apply(&tokens)
    }

    /// Exact address lookup over the whole snapshot.
    pub async fn get_token_by_address(&self, address: &str) -> Option<Token> {
        self.current()
            .await
            .iter()
            .find(|t| t.address == address)
            .cloned()
    }

    /// At most 50 tokens matching `query` on symbol, name or address.
    pub async fn search_tokens(&self, query: &str) -> Vec<Token> {
        self.get_tokens(&TokenFilter::search(query)).await
    }

    /// When the current snapshot was fetched, if there is one.
    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.as_ref().map(|s| s.fetched_at)
    }

    pub async fn snapshot_len(&self) -> usize {
        self.state.read().await.as_ref().map_or(0, |s| s.tokens.len())
    }

    fn is_fresh(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> bool {
        let age_ms = now.timestamp_millis() - snapshot.fetched_at.timestamp_millis();
        age_ms < self.ttl.as_millis() as i64
    }

    /// Fresh snapshot, refreshing first when needed. Empty when nothing usable.
    async fn current(&self) -> Arc<Vec<Token>> {
        let now = self.clock.now();
        let previous = self.state.read().await.clone();

        if let Some(snapshot) = &previous {
            if self.is_fresh(snapshot, now) {
                debug!("Token cache hit ({} tokens)", snapshot.tokens.len());
                return snapshot.tokens.clone();
            }
        }

        match self.refresh(now).await {
            Some(tokens) => tokens,
            None => match previous {
                Some(snapshot) if self.serve_stale => {
                    warn!(
                        fetched_at = %snapshot.fetched_at,
                        "Token registries unreachable, serving stale snapshot"
                    );
                    snapshot.tokens
                }
                _ => Arc::new(Vec::new()),
            },
        }
    }

    /// Try primary then fallback. On success the new snapshot is installed,
    /// stamped with `fetched_at`.
    async fn refresh(&self, fetched_at: DateTime<Utc>) -> Option<Arc<Vec<Token>>> {
        for registry in [&self.primary, &self.fallback] {
            match registry.fetch_tokens().await {
                Ok(tokens) => {
                    let tokens = Arc::new(tokens);
                    *self.state.write().await = Some(Snapshot {
                        tokens: tokens.clone(),
                        fetched_at,
                    });
                    info!(
                        registry = registry.name(),
                        "Token cache refreshed ({} tokens)",
                        tokens.len()
                    );
                    return Some(tokens);
                }
                Err(e) => warn!(registry = registry.name(), "Token registry fetch failed: {}", e),
            }
        }

        warn!("All token registries failed");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::{MarketError, Result};
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Registry returning a fixed list, or failing when `tokens` is `None`.
    struct FakeRegistry {
        name: &'static str,
        tokens: Mutex<Option<Vec<Token>>>,
        calls: AtomicUsize,
        /// Moves the clock forward while a fetch is in flight.
        latency: Mutex<Option<(Arc<ManualClock>, ChronoDuration)>>,
    }

    impl FakeRegistry {
        fn ok(name: &'static str, tokens: Vec<Token>) -> Arc<Self> {
            Arc::new(Self {
                name,
                tokens: Mutex::new(Some(tokens)),
                calls: AtomicUsize::new(0),
                latency: Mutex::new(None),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                tokens: Mutex::new(None),
                calls: AtomicUsize::new(0),
                latency: Mutex::new(None),
            })
        }

        fn set(&self, tokens: Option<Vec<Token>>) {
            *self.tokens.lock().unwrap() = tokens;
        }

        fn slow(&self, clock: &Arc<ManualClock>, by: ChronoDuration) {
            *self.latency.lock().unwrap() = Some((clock.clone(), by));
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenRegistry for FakeRegistry {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch_tokens(&self) -> Result<Vec<Token>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some((clock, by)) = self.latency.lock().unwrap().clone() {
                clock.advance(by);
            }
            self.tokens.lock().unwrap().clone().ok_or(MarketError::Status {
                service: self.name,
                status: StatusCode::SERVICE_UNAVAILABLE,
            })
        }
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            lib_utils::millis_to_utc(1_704_067_200_000).unwrap(),
        ))
    }

    fn cache(
        primary: &Arc<FakeRegistry>,
        fallback: &Arc<FakeRegistry>,
        clock: &Arc<ManualClock>,
    ) -> TokenRegistryCache {
        let primary: Arc<dyn TokenRegistry> = primary.clone();
        let fallback: Arc<dyn TokenRegistry> = fallback.clone();
        let clock: Arc<dyn Clock> = clock.clone();
        TokenRegistryCache::new(primary, fallback, clock)
    }

    fn five_tokens() -> Vec<Token> {
        let mut usdc = Token::new("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "USDC", "USD Coin", 6);
        usdc.verified = true;
        let mut sol = Token::new("So11111111111111111111111111111111111111112", "SOL", "Wrapped SOL", 9);
        sol.verified = true;
        vec![
            sol,
            usdc,
            Token::new("Mint3", "BONK", "Bonk", 5),
            Token::new("Mint4", "WIF", "dogwifhat", 6),
            Token::new("usdcLikeMint", "XYZ", "Other", 6),
        ]
    }

    #[tokio::test]
    async fn test_offset_and_limit_preserve_order() {
        // Arrange
        let primary = FakeRegistry::ok("primary", five_tokens());
        let fallback = FakeRegistry::failing("fallback");
        let cache = cache(&primary, &fallback, &clock());
        let filter = TokenFilter {
            limit: Some(2),
            offset: Some(1),
            ..Default::default()
        };

        // Act
        let tokens = cache.get_tokens(&filter).await;

        // Assert
        let symbols: Vec<&str> = tokens.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["USDC", "BONK"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_over_symbol_name_and_address() {
        let primary = FakeRegistry::ok("primary", five_tokens());
        let fallback = FakeRegistry::failing("fallback");
        let cache = cache(&primary, &fallback, &clock());

        let tokens = cache.search_tokens("usdc").await;

        let addresses: Vec<&str> = tokens.iter().map(|t| t.address.as_str()).collect();
        assert_eq!(
            addresses,
            vec!["EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "usdcLikeMint"]
        );
    }

    #[tokio::test]
    async fn test_verified_filter() {
        let primary = FakeRegistry::ok("primary", five_tokens());
        let fallback = FakeRegistry::failing("fallback");
        let cache = cache(&primary, &fallback, &clock());
        let filter = TokenFilter {
            verified: true,
            ..Default::default()
        };

        let tokens = cache.get_tokens(&filter).await;

        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.verified));
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_does_not_fetch() {
        let primary = FakeRegistry::ok("primary", five_tokens());
        let fallback = FakeRegistry::ok("fallback", Vec::new());
        let clock = clock();
        let cache = cache(&primary, &fallback, &clock);

        cache.get_tokens(&TokenFilter::default()).await;
        clock.advance(ChronoDuration::minutes(59));
        cache.get_token_by_address("Mint3").await;

        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_expired_snapshot_refreshes_once() {
        // Arrange
        let primary = FakeRegistry::ok("primary", five_tokens());
        let fallback = FakeRegistry::failing("fallback");
        let clock = clock();
        let cache = cache(&primary, &fallback, &clock);
        cache.get_tokens(&TokenFilter::default()).await;

        // Act
        clock.advance(ChronoDuration::hours(1));
        primary.set(Some(vec![Token::new("NewMint", "NEW", "New", 6)]));
        let first = cache.get_tokens(&TokenFilter::default()).await;
        let second = cache.get_tokens(&TokenFilter::default()).await;

        // Assert
        assert_eq!(primary.calls(), 2);
        assert_eq!(first.len(), 1);
        assert_eq!(second, first);
        assert_eq!(cache.fetched_at().await, Some(clock.now()));
    }

    #[tokio::test]
    async fn test_primary_failure_uses_fallback() {
        // Arrange
        let primary = FakeRegistry::failing("primary");
        let fallback = FakeRegistry::ok("fallback", vec![Token::new("Mint9", "FB", "Fallback", 6)]);
        let clock = clock();
        let cache = cache(&primary, &fallback, &clock);

        // Act
        let tokens = cache.get_tokens(&TokenFilter::default()).await;

        // Assert
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].symbol, "FB");
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);
        assert_eq!(cache.fetched_at().await, Some(clock.now()));
    }

    #[tokio::test]
    async fn test_fallback_refresh_replaces_warm_snapshot() {
        // Arrange
        let primary = FakeRegistry::ok("primary", five_tokens());
        let fallback = FakeRegistry::ok("fallback", vec![Token::new("Mint9", "FB", "Fallback", 6)]);
        let clock = clock();
        let cache = cache(&primary, &fallback, &clock);
        cache.get_tokens(&TokenFilter::default()).await;
        let first_fetch = cache.fetched_at().await;

        // Act
        clock.advance(ChronoDuration::hours(1) + ChronoDuration::seconds(1));
        primary.set(None);
        let tokens = cache.get_tokens(&TokenFilter::default()).await;

        // Assert
        let symbols: Vec<&str> = tokens.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["FB"]);
        assert_eq!(primary.calls(), 2);
        assert_eq!(fallback.calls(), 1);
        assert_eq!(cache.snapshot_len().await, 1);
        assert_eq!(cache.fetched_at().await, Some(clock.now()));
        assert_ne!(cache.fetched_at().await, first_fetch);
    }

    #[tokio::test]
    async fn test_fetched_at_is_stamped_before_the_fetch() {
        // Arrange
        let primary = FakeRegistry::ok("primary", five_tokens());
        let fallback = FakeRegistry::failing("fallback");
        let clock = clock();
        let cache = cache(&primary, &fallback, &clock);
        primary.slow(&clock, ChronoDuration::seconds(30));
        let requested_at = clock.now();

        // Act
        cache.get_tokens(&TokenFilter::default()).await;

        // Assert
        assert_eq!(cache.fetched_at().await, Some(requested_at));
        assert_ne!(clock.now(), requested_at);
    }

    #[tokio::test]
    async fn test_total_failure_returns_empty_and_keeps_snapshot() {
        // Arrange
        let primary = FakeRegistry::ok("primary", five_tokens());
        let fallback = FakeRegistry::failing("fallback");
        let clock = clock();
        let cache = cache(&primary, &fallback, &clock);
        cache.get_tokens(&TokenFilter::default()).await;
        let first_fetch = cache.fetched_at().await;

        // Act
        clock.advance(ChronoDuration::hours(2));
        primary.set(None);
        let tokens = cache.get_tokens(&TokenFilter::default()).await;

        // Assert
        assert!(tokens.is_empty());
        assert!(cache.get_token_by_address("Mint3").await.is_none());
        assert_eq!(cache.snapshot_len().await, 5);
        assert_eq!(cache.fetched_at().await, first_fetch);
    }

    #[tokio::test]
    async fn test_total_failure_serves_stale_when_enabled() {
        let primary = FakeRegistry::ok("primary", five_tokens());
        let fallback = FakeRegistry::failing("fallback");
        let clock = clock();
        let cache = cache(&primary, &fallback, &clock).with_serve_stale(true);
        cache.get_tokens(&TokenFilter::default()).await;

        clock.advance(ChronoDuration::hours(2));
        primary.set(None);

        assert_eq!(cache.get_tokens(&TokenFilter::default()).await.len(), 5);
        assert_eq!(
            cache.get_token_by_address("Mint4").await.map(|t| t.symbol),
            Some("WIF".to_string())
        );
    }

    #[tokio::test]
    async fn test_cold_cache_with_no_registry_is_empty() {
        let primary = FakeRegistry::failing("primary");
        let fallback = FakeRegistry::failing("fallback");
        let cache = cache(&primary, &fallback, &clock()).with_serve_stale(true);

        assert!(cache.get_tokens(&TokenFilter::default()).await.is_empty());
        assert!(cache.fetched_at().await.is_none());
    }

    #[tokio::test]
    async fn test_custom_ttl() {
        let primary = FakeRegistry::ok("primary", five_tokens());
        let fallback = FakeRegistry::failing("fallback");
        let clock = clock();
        let cache = cache(&primary, &fallback, &clock).with_ttl(Duration::from_secs(60));

        cache.get_tokens(&TokenFilter::default()).await;
        clock.advance(ChronoDuration::seconds(61));
        cache.get_tokens(&TokenFilter::default()).await;

        assert_eq!(primary.calls(), 2);
    }
}
