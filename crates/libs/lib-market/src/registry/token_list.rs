//! # Solana Labs Token List
//!
//! Fallback registry: `{ "tokens": [...] }` in the token-list standard.

use super::{dedupe_tokens, TokenRegistry};
use crate::error::Result;
use crate::http::send_json;
use async_trait::async_trait;
use lib_core::dto::{Token, TokenMetadata};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

const SERVICE: &str = "solana-token-list";

#[derive(Debug, Deserialize)]
pub struct TokenListResponse {
    #[serde(default)]
    pub tokens: Vec<TokenListEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenListEntry {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(rename = "logoURI")]
    pub logo_uri: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub verified: bool,
    pub extensions: Option<TokenMetadata>,
}

impl From<TokenListEntry> for Token {
    fn from(entry: TokenListEntry) -> Self {
        let mut token = Token::new(entry.address, entry.symbol, entry.name, entry.decimals);
        token.logo_uri = entry.logo_uri;
        token.verified = entry.verified;
        token.tags = entry.tags;
        token.metadata = entry.extensions.filter(|m| !m.is_empty());
        token
    }
}

pub struct SolanaTokenList {
    http: Client,
    url: String,
}

impl SolanaTokenList {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }

    pub fn map_response(response: TokenListResponse) -> Vec<Token> {
        dedupe_tokens(response.tokens.into_iter().map(Token::from).collect())
    }
}

#[async_trait]
impl TokenRegistry for SolanaTokenList {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn fetch_tokens(&self) -> Result<Vec<Token>> {
        let response: TokenListResponse = send_json(SERVICE, self.http.get(&self.url)).await?;
        let tokens = Self::map_response(response);
        info!("Solana token list fetched ({} tokens)", tokens.len());
        Ok(tokens)
    }
}
