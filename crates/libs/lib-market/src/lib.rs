//! # Market Library
//!
//! Price aggregation across external quote services and the cached Solana token
//! registry.

// region: --- Modules
pub mod aggregator;
pub mod cache;
pub mod clock;
pub mod error;
pub mod http;
pub mod registry;
pub mod sources;
pub mod state;
// endregion: --- Modules

pub use aggregator::PriceAggregator;
pub use cache::TokenRegistryCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{MarketError, Result};
pub use registry::TokenRegistry;
pub use sources::{PriceSource, SourceId};
pub use state::MarketState;
