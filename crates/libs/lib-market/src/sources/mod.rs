//! # Price Sources
//!
//! Adapters for the external price services the aggregator fans out to.
//!
//! Every adapter implements [`PriceSource`]: it receives all requested token
//! mints in one call and returns quotes for whichever tokens it could resolve.
//! Adapters are free to fail; the aggregator absorbs their errors at the task
//! boundary.
//!
//! | id | batching | notes |
//! |---|---|---|
//! | `coingecko` | batch by coin id | only well-known mints have a coin id |
//! | `birdeye` | batch | requires `BIRDEYE_API_KEY` |
//! | `jupiter` | batch | |
//! | `dexscreener` | batch | one quote per trading pair |

// region: --- Modules
pub mod birdeye;
pub mod coingecko;
pub mod dexscreener;
pub mod jupiter;
// endregion: --- Modules

use crate::error::Result;
use async_trait::async_trait;
use lib_core::dto::PriceQuote;
use std::fmt;
use std::str::FromStr;

pub use birdeye::BirdeyeSource;
pub use coingecko::CoinGeckoSource;
pub use dexscreener::DexScreenerSource;
pub use jupiter::JupiterPriceSource;

/// Identifier of a configured price source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    CoinGecko,
    Birdeye,
    Jupiter,
    DexScreener,
}

impl SourceId {
    /// All sources in fan-out order.
    pub const ALL: [SourceId; 4] = [
        SourceId::CoinGecko,
        SourceId::Birdeye,
        SourceId::Jupiter,
        SourceId::DexScreener,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::CoinGecko => "coingecko",
            SourceId::Birdeye => "birdeye",
            SourceId::Jupiter => "jupiter",
            SourceId::DexScreener => "dexscreener",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coingecko" => Ok(SourceId::CoinGecko),
            "birdeye" => Ok(SourceId::Birdeye),
            "jupiter" => Ok(SourceId::Jupiter),
            "dexscreener" => Ok(SourceId::DexScreener),
            other => Err(format!("Unknown price source: {}", other)),
        }
    }
}

/// A price service the aggregator can query.
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn id(&self) -> SourceId;

    /// Quote every token this source can resolve. Unresolvable tokens are
    /// simply absent from the result.
    async fn fetch_quotes(&self, tokens: &[String]) -> Result<Vec<PriceQuote>>;
}

/// Accept only finite, non-negative prices.
pub(crate) fn usable_price(price: f64) -> Option<f64> {
    (price.is_finite() && price >= 0.0).then_some(price)
}

// region: --- Well-known mints
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const USDT_MINT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";
pub const WBTC_MINT: &str = "3NZ9JMVBmGAqocybic2c7LQCJScmgsAZ6vQqTDzcqmJh";
pub const WETH_MINT: &str = "7vfCXTUXx5WJV5JADk17DUJ4ksgau7utNKj4b963voxs";
pub const JUP_MINT: &str = "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN";
pub const RAY_MINT: &str = "4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R";
pub const ORCA_MINT: &str = "orcaEKTdK7LKz57vaAYr9QeNsVEPfiu6QeMU1kektZE";
pub const BONK_MINT: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";
pub const WIF_MINT: &str = "EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm";
// endregion: --- Well-known mints
