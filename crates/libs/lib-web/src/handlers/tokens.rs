//! # Token Handlers
//!
//! Views over the cached token registry. The first request after start-up (or
//! after the cache TTL) pays for the registry download.
//!
//! ```bash
//! curl "http://localhost:3001/api/tokens?verified=true&limit=20"
//! curl "http://localhost:3001/api/tokens/search?q=bonk"
//! curl http://localhost:3001/api/tokens/EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v
//! ```

use crate::services::MarketService;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use lib_core::dto::{Token, TokenFilter, TokenListQuery, TokenSearchQuery};
use lib_core::Result;
use lib_market::MarketState;
use std::sync::Arc;
use tracing::{info, instrument};

/// **Route**: `GET /api/tokens?search=&verified=&limit=&offset=`
///
/// `verified` filters only for the literal `true`. `limit` defaults to 100.
#[instrument(skip(market))]
pub async fn list_tokens(
    State(market): State<Arc<MarketState>>,
    Query(params): Query<TokenListQuery>,
) -> Json<Vec<Token>> {
    let filter = TokenFilter::from(params);
    let tokens = MarketService::new(market).get_tokens(&filter).await;

    info!("[TOKENS] Returning {} tokens", tokens.len());
    Json(tokens)
}

/// **Route**: `GET /api/tokens/search?q=`
///
/// At most 50 matches on symbol, name or address.
///
/// Error (400): `q` missing or empty
#[instrument(skip(market))]
pub async fn search_tokens(
    State(market): State<Arc<MarketState>>,
    Query(params): Query<TokenSearchQuery>,
) -> Result<Json<Vec<Token>>> {
    let tokens = MarketService::new(market)
        .search_tokens(params.q.as_deref())
        .await?;

    info!("[TOKENS] Search returned {} tokens", tokens.len());
    Ok(Json(tokens))
}

/// **Route**: `GET /api/tokens/{address}`
///
/// Error (404): no token with this address
#[instrument(skip(market))]
pub async fn get_token(
    State(market): State<Arc<MarketState>>,
    Path(address): Path<String>,
) -> Result<Json<Token>> {
    let token = MarketService::new(market).get_token(&address).await?;
    Ok(Json(token))
}
