//! # Handler Tests
//!
//! Drive the full router (middleware included) with in-memory price sources
//! and token registries.


use crate::server::{create_router, AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use lib_core::dto::{PriceQuote, Token};
use lib_market::error::{MarketError, Result};
use lib_market::{
    Clock, ManualClock, MarketState, PriceAggregator, PriceSource, SourceId, TokenRegistry,
    TokenRegistryCache,
};
use std::sync::Arc;
use tower::ServiceExt;

pub const SOL: &str = "So11111111111111111111111111111111111111112";
pub const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

/// Price source answering from a fixed table.
pub struct FixedSource {
    id: SourceId,
    prices: Vec<(&'static str, f64)>,
}

#[async_trait]
impl PriceSource for FixedSource {
    fn id(&self) -> SourceId {
        self.id
    }

    async fn fetch_quotes(&self, tokens: &[String]) -> Result<Vec<PriceQuote>> {
        Ok(self
            .prices
            .iter()
            .filter(|(t, _)| tokens.iter().any(|r| r.as_str() == *t))
            .map(|(t, p)| PriceQuote::new(*t, *p, 0, self.id.as_str()))
            .collect())
    }
}

/// Registry serving a fixed list, or failing when `None`.
pub struct FixedRegistry(Option<Vec<Token>>);

#[async_trait]
impl TokenRegistry for FixedRegistry {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn fetch_tokens(&self) -> Result<Vec<Token>> {
        self.0.clone().ok_or(MarketError::MissingApiKey("fixed"))
    }
}

pub fn sample_tokens() -> Vec<Token> {
    let mut sol = Token::new(SOL, "SOL", "Wrapped SOL", 9);
    sol.verified = true;
    let mut usdc = Token::new(USDC, "USDC", "USD Coin", 6);
    usdc.verified = true;
    vec![
        sol,
        usdc,
        Token::new("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", "Bonk", "Bonk", 5),
    ]
}

/// Jupiter quotes SOL at 140, DexScreener at 150. Nobody prices USDC.
pub fn test_app() -> Router {
    test_app_with(sample_tokens())
}

pub fn test_app_with(tokens: Vec<Token>) -> Router {
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(
        lib_utils::millis_to_utc(1_704_067_200_000).unwrap(),
    ));

    let sources: Vec<Arc<dyn PriceSource>> = vec![
        Arc::new(FixedSource {
            id: SourceId::Jupiter,
            prices: vec![(SOL, 140.0)],
        }),
        Arc::new(FixedSource {
            id: SourceId::DexScreener,
            prices: vec![(SOL, 150.0)],
        }),
    ];
    let aggregator = PriceAggregator::new(sources, clock.clone());

    let primary: Arc<dyn TokenRegistry> = Arc::new(FixedRegistry(Some(tokens)));
    let fallback: Arc<dyn TokenRegistry> = Arc::new(FixedRegistry(None));
    let cache = TokenRegistryCache::new(primary, fallback, clock);

    let state = AppState {
        market: Arc::new(MarketState::new(Arc::new(aggregator), Arc::new(cache))),
    };
    create_router(state, &[])
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json<T: serde::de::DeserializeOwned>(response: Response<Body>) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = get(test_app(), "/health").await;

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = get(test_app(), "/api/unknown").await;

    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}
