//! # HTTP Request Handlers
//!
//! Axum handlers grouped by resource. Each handler builds a
//! [`MarketService`](crate::services::MarketService) from the shared
//! [`MarketState`](lib_market::MarketState) and returns JSON or an
//! [`AppError`](lib_core::AppError).
//!
//! ## Handler Modules
//!
//! - **[`prices`]**: Aggregated token prices
//!   - `GET /api/prices?tokens=<csv>&sources=<csv>`
//!   - `GET /api/prices/{token}`
//!
//! - **[`tokens`]**: Token registry views
//!   - `GET /api/tokens?search=&verified=&limit=&offset=`
//!   - `GET /api/tokens/search?q=`
//!   - `GET /api/tokens/{address}`
//!
//! ## Error Handling
//!
//! Handlers return `lib_core::Result<Json<T>>`. Errors render as
//! `{"error": "...", "code": "..."}` with the status from
//! [`AppError::status_code`](lib_core::AppError::status_code).

pub mod prices;
pub mod tokens;

#[cfg(test)]
mod tests;
