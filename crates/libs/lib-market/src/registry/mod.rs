//! # Token Registries
//!
//! External token lists the registry cache refreshes from:
//!
//! - [`JupiterTokenList`] - primary, the complete token universe (~10⁴ entries)
//! - [`SolanaTokenList`] - fallback, the Solana Labs token-list (smaller, partly stale)

// region: --- Modules
pub mod jupiter;
pub mod token_list;
// endregion: --- Modules

use crate::error::Result;
use async_trait::async_trait;
use lib_core::dto::Token;
use std::collections::HashSet;

pub use jupiter::JupiterTokenList;
pub use token_list::SolanaTokenList;

/// A source of the full token list.
#[async_trait]
pub trait TokenRegistry: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    async fn fetch_tokens(&self) -> Result<Vec<Token>>;
}

/// Drop repeated addresses (first occurrence wins) and repeated tags.
pub(crate) fn dedupe_tokens(tokens: Vec<Token>) -> Vec<Token> {
    let mut seen: HashSet<String> = HashSet::with_capacity(tokens.len());
    tokens
        .into_iter()
        .filter(|t| seen.insert(t.address.clone()))
        .map(|mut t| {
            let mut tags_seen = HashSet::new();
            t.tags.retain(|tag| tags_seen.insert(tag.clone()));
            t
        })
        .collect()
}
