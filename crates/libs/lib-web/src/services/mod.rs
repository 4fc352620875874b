//! # Services Layer
//!
//! Business logic between the HTTP handlers and the market integration layer:
//!
//! ```text
//! Handlers (HTTP) → Services → lib-market (aggregator, registry cache)
//! ```
//!
//! Services return `lib_core::Result<T>`; handlers pass the error straight to
//! axum.

pub mod market;

pub use market::MarketService;
