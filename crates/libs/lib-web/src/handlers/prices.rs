//! # Price Handlers
//!
//! ```bash
//! # Aggregated prices for SOL and USDC from every source
//! curl "http://localhost:3001/api/prices?tokens=So11111111111111111111111111111111111111112,EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"
//!
//! # Only Jupiter and DexScreener
//! curl "http://localhost:3001/api/prices?tokens=So11111111111111111111111111111111111111112&sources=jupiter,dexscreener"
//! ```

use crate::services::MarketService;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use lib_core::dto::{PriceListQuery, PriceQuote};
use lib_core::Result;
use lib_market::MarketState;
use std::sync::Arc;
use tracing::{info, instrument};

/// Aggregated prices for several tokens.
///
/// **Route**: `GET /api/prices`
///
/// Tokens no source could price are left out of the array.
///
/// Response:
/// ```json
/// [
///   {
///     "token": "So11111111111111111111111111111111111111112",
///     "price": 145.31,
///     "timestamp": 1704067200000,
///     "source": "aggregated",
///     "liquidity": 912345.0,
///     "volume24h": 301234.0
///   }
/// ]
/// ```
///
/// Error (400): `tokens` missing or empty
#[instrument(skip(market))]
pub async fn get_prices(
    State(market): State<Arc<MarketState>>,
    Query(params): Query<PriceListQuery>,
) -> Result<Json<Vec<PriceQuote>>> {
    let quotes = MarketService::new(market)
        .get_prices(params.tokens.as_deref(), params.sources.as_deref())
        .await?;

    info!("[PRICES] Returning {} prices", quotes.len());
    Ok(Json(quotes))
}

/// Aggregated price for one token.
///
/// **Route**: `GET /api/prices/{token}`
///
/// Always 200; an unpriced token comes back with `price: 0` and
/// `source: "unknown"`.
#[instrument(skip(market))]
pub async fn get_price(
    State(market): State<Arc<MarketState>>,
    Path(token): Path<String>,
) -> Result<Json<PriceQuote>> {
    let quote = MarketService::new(market).get_price(&token).await?;

    if quote.is_unknown() {
        info!("[PRICES] No source could price {}", token);
    }
    Ok(Json(quote))
}
