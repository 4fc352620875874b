//! # Market Gateway
//!
//! Thin entry point that delegates to lib-web for server setup. All settings
//! come from the environment (or `.env`); see `lib_core::config`.

use lib_web::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    start_server(ServerConfig::default()).await
}
