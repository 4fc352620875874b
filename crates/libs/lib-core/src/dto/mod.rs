//! # Data Transfer Objects (DTOs)
//!
//! This module contains all data structures exchanged between the market
//! gateway and its HTTP clients, plus the shapes the price and token services
//! pass between each other.

pub mod market;

pub use market::*;

use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint.
///
/// ```json
/// { "error": "No tokens specified", "code": "InvalidInput" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
