//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance:
//!
//! ```rust,no_run
//! use lib_core::config::core_config;
//!
//! let config = core_config();
//! let ttl = config.token_cache_ttl();
//! ```
//!
//! The config must be initialized once at application startup using [`init_config()`].
//! Tests build a [`Config`] directly (usually from [`Config::default()`]).

use lib_utils::{get_env_opt, get_env_or, get_env_parse_or, parse_csv};
use std::sync::OnceLock;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Bind address for the HTTP server (e.g., "127.0.0.1:3001")
    pub bind_address: String,

    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,

    /// Request timeout applied by the shared HTTP client, in seconds
    pub http_timeout_secs: u64,

    /// Upper bound for a single price source query, in milliseconds
    ///
    /// A source that does not answer in time contributes nothing to the merge.
    pub price_source_timeout_ms: u64,

    /// How long a token registry snapshot stays fresh, in seconds
    pub token_cache_ttl_secs: u64,

    /// Serve the previous snapshot when both registries fail
    ///
    /// Off by default: a failed refresh yields an empty list for that call.
    pub token_cache_serve_stale: bool,

    pub coingecko_api_base: String,
    pub birdeye_api_base: String,
    /// Birdeye rejects requests without a key; the source stays silent when unset.
    pub birdeye_api_key: Option<String>,
    pub jupiter_price_api_base: String,
    pub dexscreener_api_base: String,

    /// Complete token universe (Jupiter token list)
    pub token_list_primary_url: String,
    /// Smaller token list used when the primary is unavailable
    pub token_list_fallback_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:3002".to_string(),
                "http://127.0.0.1:3002".to_string(),
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
            http_timeout_secs: 10,
            price_source_timeout_ms: 5_000,
            token_cache_ttl_secs: 3_600,
            token_cache_serve_stale: false,
            coingecko_api_base: "https://api.coingecko.com/api/v3".to_string(),
            birdeye_api_base: "https://public-api.birdeye.so".to_string(),
            birdeye_api_key: None,
            jupiter_price_api_base: "https://price.jup.ag/v6".to_string(),
            dexscreener_api_base: "https://api.dexscreener.com/latest/dex".to_string(),
            token_list_primary_url: "https://token.jup.ag/all".to_string(),
            token_list_fallback_url:
                "https://raw.githubusercontent.com/solana-labs/token-list/main/src/tokens/solana.tokenlist.json"
                    .to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unset ones keep the [`Default`] value.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let allowed_origins = match get_env_opt("ALLOWED_ORIGINS") {
            Some(raw) => parse_csv(Some(&raw)),
            None => defaults.allowed_origins,
        };

        Ok(Self {
            bind_address: get_env_or("BIND_ADDRESS", &defaults.bind_address),
            allowed_origins,
            http_timeout_secs: get_env_parse_or("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)
                .map_err(|e| format!("HTTP_TIMEOUT_SECS must be a valid number: {}", e))?,
            price_source_timeout_ms: get_env_parse_or(
                "PRICE_SOURCE_TIMEOUT_MS",
                defaults.price_source_timeout_ms,
            )
            .map_err(|e| format!("PRICE_SOURCE_TIMEOUT_MS must be a valid number: {}", e))?,
            token_cache_ttl_secs: get_env_parse_or("TOKEN_CACHE_TTL_SECS", defaults.token_cache_ttl_secs)
                .map_err(|e| format!("TOKEN_CACHE_TTL_SECS must be a valid number: {}", e))?,
            token_cache_serve_stale: get_env_parse_or(
                "TOKEN_CACHE_SERVE_STALE",
                defaults.token_cache_serve_stale,
            )
            .map_err(|e| format!("TOKEN_CACHE_SERVE_STALE must be true or false: {}", e))?,
            coingecko_api_base: get_env_or("COINGECKO_API_BASE", &defaults.coingecko_api_base),
            birdeye_api_base: get_env_or("BIRDEYE_API_BASE", &defaults.birdeye_api_base),
            birdeye_api_key: get_env_opt("BIRDEYE_API_KEY"),
            jupiter_price_api_base: get_env_or("JUPITER_PRICE_API_BASE", &defaults.jupiter_price_api_base),
            dexscreener_api_base: get_env_or("DEXSCREENER_API_BASE", &defaults.dexscreener_api_base),
            token_list_primary_url: get_env_or("TOKEN_LIST_PRIMARY_URL", &defaults.token_list_primary_url),
            token_list_fallback_url: get_env_or("TOKEN_LIST_FALLBACK_URL", &defaults.token_list_fallback_url),
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.http_timeout_secs == 0 {
            return Err("HTTP_TIMEOUT_SECS must be greater than 0".to_string());
        }

        if self.price_source_timeout_ms == 0 {
            return Err("PRICE_SOURCE_TIMEOUT_MS must be greater than 0".to_string());
        }

        if self.token_cache_ttl_secs == 0 {
            return Err("TOKEN_CACHE_TTL_SECS must be at least 1".to_string());
        }

        let urls = [
            ("COINGECKO_API_BASE", &self.coingecko_api_base),
            ("BIRDEYE_API_BASE", &self.birdeye_api_base),
            ("JUPITER_PRICE_API_BASE", &self.jupiter_price_api_base),
            ("DEXSCREENER_API_BASE", &self.dexscreener_api_base),
            ("TOKEN_LIST_PRIMARY_URL", &self.token_list_primary_url),
            ("TOKEN_LIST_FALLBACK_URL", &self.token_list_fallback_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("{} must be an http(s) URL, got '{}'", name, url));
            }
        }

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn price_source_timeout(&self) -> Duration {
        Duration::from_millis(self.price_source_timeout_ms)
    }

    pub fn token_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.token_cache_ttl_secs)
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration.
///
/// This should be called once at application startup, before the market
/// services are built.
///
/// # Errors
///
/// Returns an error if:
/// - Environment variables are invalid
/// - Configuration validation fails
/// - Config has already been initialized
pub fn init_config() -> Result<(), String> {
    let config = Config::from_env()?;
    config.validate()?;

    CONFIG.set(config)
        .map_err(|_| "Config has already been initialized".to_string())
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn core_config() -> &'static Config {
    CONFIG.get().expect("Config must be initialized with init_config() before use")
}
