//! # Jupiter Token List
//!
//! Primary registry. `GET {url}` returns a JSON array of every token Jupiter
//! knows about, with optional social links either at top level or under
//! `extensions`.

use super::{dedupe_tokens, TokenRegistry};
use crate::error::Result;
use crate::http::send_json;
use async_trait::async_trait;
use lib_core::dto::{Token, TokenMetadata};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

const SERVICE: &str = "jupiter-token-list";

/// Tags Jupiter uses for vetted tokens.
const VERIFIED_TAGS: [&str; 2] = ["verified", "strict"];

/// Token information from Jupiter token list
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JupiterTokenInfo {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(rename = "logoURI")]
    pub logo_uri: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    pub verified: Option<bool>,
    #[serde(rename = "daily_volume")]
    pub daily_volume: Option<f64>,
    #[serde(flatten)]
    pub links: TokenMetadata,
    pub extensions: Option<TokenMetadata>,
}

impl From<JupiterTokenInfo> for Token {
    fn from(info: JupiterTokenInfo) -> Self {
        let tags = info.tags.unwrap_or_default();
        let verified = info.verified.unwrap_or(false)
            || tags.iter().any(|t| VERIFIED_TAGS.contains(&t.as_str()));

        let extensions = info.extensions.unwrap_or_default();
        let metadata = TokenMetadata {
            website: info.links.website.or(extensions.website),
            twitter: info.links.twitter.or(extensions.twitter),
            telegram: info.links.telegram.or(extensions.telegram),
            discord: info.links.discord.or(extensions.discord),
        };

        let mut token = Token::new(info.address, info.symbol, info.name, info.decimals);
        token.logo_uri = info.logo_uri;
        token.tags = tags;
        token.verified = verified;
        token.volume24h = info.daily_volume;
        token.metadata = (!metadata.is_empty()).then_some(metadata);
        token
    }
}

pub struct JupiterTokenList {
    http: Client,
    url: String,
}

impl JupiterTokenList {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }

    pub fn map_response(infos: Vec<JupiterTokenInfo>) -> Vec<Token> {
        dedupe_tokens(infos.into_iter().map(Token::from).collect())
    }
}

#[async_trait]
impl TokenRegistry for JupiterTokenList {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn fetch_tokens(&self) -> Result<Vec<Token>> {
        let infos: Vec<JupiterTokenInfo> = send_json(SERVICE, self.http.get(&self.url)).await?;
        let tokens = Self::map_response(infos);
        info!("Jupiter token list fetched ({} tokens)", tokens.len());
        Ok(tokens)
    }
}
