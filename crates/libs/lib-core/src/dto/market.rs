//! # Market Data Transfer Objects
//!
//! Defines price quotes, token metadata and the query shapes used by the
//! price and token endpoints.
//!
//! ## Endpoints Using These DTOs
//!
//! - `GET /api/prices?tokens=<csv>&sources=<csv>` - [`PriceListQuery`] → `Vec<PriceQuote>`
//! - `GET /api/prices/{token}` - single [`PriceQuote`]
//! - `GET /api/tokens?search=&verified=&limit=&offset=` - [`TokenListQuery`] → `Vec<Token>`
//! - `GET /api/tokens/search?q=` - [`TokenSearchQuery`] → `Vec<Token>`
//! - `GET /api/tokens/{address}` - single [`Token`]
//!
//! ## Wire Format
//!
//! Unlike the rest of the API, market DTOs use **camelCase** field names so the
//! web front-end can consume them without remapping (`volume24h`, `logoURI`,
//! `priceChange24h`). Optional numeric fields are omitted when absent.
//!
//! ## Example Aggregated Price
//!
//! ```json
//! {
//!   "token": "So11111111111111111111111111111111111111112",
//!   "price": 145.52,
//!   "timestamp": 1704067200000,
//!   "source": "aggregated",
//!   "liquidity": 1250000.0
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Source tag carried by merged prices.
pub const SOURCE_AGGREGATED: &str = "aggregated";

/// Source tag carried by the "no data" sentinel.
pub const SOURCE_UNKNOWN: &str = "unknown";

/// Default page size for token listings.
pub const DEFAULT_TOKEN_LIMIT: usize = 100;

/// Page size used by token search.
pub const SEARCH_TOKEN_LIMIT: usize = 50;

/// One source's observation of a token price, or the merged result of several.
///
/// Quotes are created fresh per request and never mutated afterwards.
/// A price of `0` with source [`SOURCE_UNKNOWN`] means "no data", not a real
/// market price of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// Token mint address (opaque identifier).
    pub token: String,

    /// Price in USD. Never negative.
    pub price: f64,

    /// Observation instant as Unix epoch milliseconds.
    pub timestamp: i64,

    /// Origin service, `"aggregated"` for merged quotes, `"unknown"` for the sentinel.
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume24h: Option<f64>,
}

impl PriceQuote {
    pub fn new(token: impl Into<String>, price: f64, timestamp: i64, source: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            price,
            timestamp,
            source: source.into(),
            liquidity: None,
            volume24h: None,
        }
    }

    /// Attach supplementary market depth figures.
    pub fn with_market_data(mut self, liquidity: Option<f64>, volume24h: Option<f64>) -> Self {
        self.liquidity = liquidity;
        self.volume24h = volume24h;
        self
    }

    /// Sentinel returned when no source could price `token`.
    pub fn unknown(token: impl Into<String>, timestamp: i64) -> Self {
        Self::new(token, 0.0, timestamp, SOURCE_UNKNOWN)
    }

    /// True for the "no data" sentinel.
    pub fn is_unknown(&self) -> bool {
        self.source == SOURCE_UNKNOWN
    }
}

/// Social and project links attached to a registry entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
}

impl TokenMetadata {
    pub fn is_empty(&self) -> bool {
        self.website.is_none()
            && self.twitter.is_none()
            && self.telegram.is_none()
            && self.discord.is_none()
    }
}

/// Token registry entry.
///
/// `address` is unique within one registry snapshot.
///
/// ## JSON Example
///
/// ```json
/// {
///   "address": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
///   "symbol": "USDC",
///   "name": "USD Coin",
///   "decimals": 6,
///   "logoURI": "https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v/logo.png",
///   "tags": ["stablecoin"],
///   "verified": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,

    #[serde(rename = "logoURI", default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub verified: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TokenMetadata>,
}

impl Token {
    /// Minimal entry with no live market data.
    pub fn new(
        address: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
            name: name.into(),
            decimals,
            logo_uri: None,
            tags: Vec::new(),
            verified: false,
            price: None,
            price_change24h: None,
            volume24h: None,
            market_cap: None,
            liquidity: None,
            metadata: None,
        }
    }

    /// Case-insensitive substring match on symbol, name or address.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.symbol.to_lowercase().contains(needle)
            || self.name.to_lowercase().contains(needle)
            || self.address.to_lowercase().contains(needle)
    }
}

/// Filter and pagination applied to the cached token list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFilter {
    /// Case-insensitive substring over symbol, name and address.
    pub search: Option<String>,
    /// Keep only verified tokens when `true`.
    pub verified: bool,
    /// Page size (default [`DEFAULT_TOKEN_LIMIT`]).
    pub limit: Option<usize>,
    /// Entries to skip before the page starts (default 0).
    pub offset: Option<usize>,
}

impl TokenFilter {
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search: Some(query.into()),
            limit: Some(SEARCH_TOKEN_LIMIT),
            ..Default::default()
        }
    }

    /// Page size; a zero limit means the default page.
    pub fn limit(&self) -> usize {
        self.limit.filter(|&limit| limit > 0).unwrap_or(DEFAULT_TOKEN_LIMIT)
    }

    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    /// Apply search, verified flag and pagination, preserving input order.
    pub fn apply(&self, tokens: &[Token]) -> Vec<Token> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        tokens
            .iter()
            .filter(|t| needle.as_deref().map_or(true, |n| t.matches_search(n)))
            .filter(|t| !self.verified || t.verified)
            .skip(self.offset())
            .take(self.limit())
            .cloned()
            .collect()
    }
}

/// Query parameters for `GET /api/prices`.
#[derive(Debug, Default, Deserialize)]
pub struct PriceListQuery {
    /// Comma-separated token mint addresses.
    pub tokens: Option<String>,
    /// Comma-separated source ids (coingecko, birdeye, jupiter, dexscreener).
    pub sources: Option<String>,
}

/// Query parameters for `GET /api/tokens`.
#[derive(Debug, Default, Deserialize)]
pub struct TokenListQuery {
    pub search: Option<String>,
    /// Only the literal `true` enables the verified filter.
    pub verified: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl From<TokenListQuery> for TokenFilter {
    fn from(query: TokenListQuery) -> Self {
        Self {
            search: query.search.filter(|s| !s.is_empty()),
            verified: query.verified.as_deref() == Some("true"),
            limit: query.limit,
            offset: query.offset,
        }
    }
}

/// Query parameters for `GET /api/tokens/search`.
#[derive(Debug, Default, Deserialize)]
pub struct TokenSearchQuery {
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tokens() -> Vec<Token> {
        let mut usdc = Token::new("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "USDC", "USD Coin", 6);
        usdc.verified = true;
        let mut sol = Token::new("So11111111111111111111111111111111111111112", "SOL", "Wrapped SOL", 9);
        sol.verified = true;
        let bridged = Token::new("A9mUU4qviSctJVPJdBJWkb28deg915LYJKrzQ19ji3FM", "USDCet", "Bridged usdc (Wormhole)", 6);
        let bonk = Token::new("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", "Bonk", "Bonk", 5);
        let fake = Token::new("usdcFakeMint1111111111111111111111111111111", "FAKE", "Not a stable", 6);
        vec![usdc, sol, bridged, bonk, fake]
    }

    #[test]
    fn test_search_matches_symbol_name_and_address_case_insensitively() {
        let tokens = sample_tokens();

        let found = TokenFilter { search: Some("usdc".into()), ..Default::default() }.apply(&tokens);

        let symbols: Vec<&str> = found.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["USDC", "USDCet", "FAKE"]);
    }

    #[test]
    fn test_offset_then_limit_preserves_order() {
        let tokens = sample_tokens();

        let page = TokenFilter { limit: Some(2), offset: Some(1), ..Default::default() }.apply(&tokens);

        assert_eq!(page, vec![tokens[1].clone(), tokens[2].clone()]);
    }

    #[test]
    fn test_verified_filter_runs_before_pagination() {
        let tokens = sample_tokens();

        let page = TokenFilter { verified: true, offset: Some(1), ..Default::default() }.apply(&tokens);

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].symbol, "SOL");
    }

    #[test]
    fn test_defaults_and_out_of_range_offset() {
        let tokens = sample_tokens();
        let filter = TokenFilter::default();
        assert_eq!(filter.limit(), DEFAULT_TOKEN_LIMIT);
        assert_eq!(filter.apply(&tokens).len(), 5);

        let past_end = TokenFilter { offset: Some(10), ..Default::default() }.apply(&tokens);
        assert!(past_end.is_empty());
    }

    #[test]
    fn test_zero_limit_falls_back_to_default_page() {
        let tokens: Vec<Token> = (0..150)
            .map(|i| Token::new(format!("mint{i}"), format!("T{i}"), format!("Token {i}"), 6))
            .collect();
        let filter = TokenFilter { limit: Some(0), ..Default::default() };

        let page = filter.apply(&tokens);

        assert_eq!(filter.limit(), DEFAULT_TOKEN_LIMIT);
        assert_eq!(page.len(), DEFAULT_TOKEN_LIMIT);
        assert_eq!(page[0].address, "mint0");
    }

    #[test]
    fn test_list_query_verified_only_for_literal_true() {
        let on: TokenFilter = TokenListQuery { verified: Some("true".into()), ..Default::default() }.into();
        let off: TokenFilter = TokenListQuery { verified: Some("yes".into()), ..Default::default() }.into();
        assert!(on.verified);
        assert!(!off.verified);
    }

    #[test]
    fn test_quote_wire_format_is_camel_case() {
        let quote = PriceQuote::new("So111", 145.5, 1_704_067_200_000, "birdeye")
            .with_market_data(Some(10.0), Some(20.0));

        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(json["volume24h"], 20.0);
        assert_eq!(json["liquidity"], 10.0);
        assert!(json.get("volume_24h").is_none());
    }

    #[test]
    fn test_token_serializes_logo_uri_and_skips_empty_market_fields() {
        let mut token = Token::new("So111", "SOL", "Wrapped SOL", 9);
        token.logo_uri = Some("https://example.com/sol.png".into());

        let json = serde_json::to_value(&token).unwrap();

        assert_eq!(json["logoURI"], "https://example.com/sol.png");
        assert!(json.get("marketCap").is_none());
        assert_eq!(json["verified"], false);
    }
}
