//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! [`start_server`] loads configuration, builds the market state, and serves the
//! router produced by [`create_router`].

// region: --- Imports
use crate::handlers;
use crate::middleware::{log_requests, stamp_req, RequestStamp};
use axum::{routing::get, Router};
use lib_core::config::{core_config, init_config};
use lib_core::AppError;
use lib_market::MarketState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub market: Arc<MarketState>,
}

impl axum::extract::FromRef<AppState> for Arc<MarketState> {
    fn from_ref(state: &AppState) -> Self {
        state.market.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Overrides applied on top of the environment configuration.
#[derive(Debug, Default, Clone)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3001"); `BIND_ADDRESS` when unset
    pub bind_address: Option<String>,
    /// Allowed CORS origins; `ALLOWED_ORIGINS` when unset
    pub allowed_origins: Option<Vec<String>>,
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Install the global tracing subscriber from `LOG_LEVEL`.
fn init_tracing() -> anyhow::Result<String> {
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let filter = match log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {
            tracing_subscriber::EnvFilter::new(&log_level)
        }
        _ => tracing_subscriber::EnvFilter::new("info"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .with_file(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global tracing subscriber: {}", e))?;

    Ok(log_level)
}

/// Initialize and start the HTTP server
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading or validation fails
/// - The HTTP client for the market adapters cannot be built
/// - Server binding fails
pub async fn start_server(overrides: ServerConfig) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_level = init_tracing()?;
    info!(" SOLANA MARKET GATEWAY STARTING");
    info!(" Log level: {}", log_level);

    info!("Loading configuration...");
    init_config().map_err(AppError::Config)?;
    let mut config = core_config().clone();
    if let Some(bind_address) = overrides.bind_address {
        config.bind_address = bind_address;
    }
    if let Some(allowed_origins) = overrides.allowed_origins {
        config.allowed_origins = allowed_origins;
    }

    info!(" Initializing market integrations...");
    let market = Arc::new(MarketState::from_config(&config)?);
    info!(" Market integrations ready");

    let bind_address = config.bind_address.clone();
    let allowed_origins = config.allowed_origins.clone();
    let state = AppState { market };

    let app = create_router(state, &allowed_origins);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(" SERVER READY: http://{}", bind_address);
    log_server_info();

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the main application router with all routes
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    use axum::http::{HeaderValue, Method};

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            crate::middleware::REQUEST_ID_HEADER,
        ]);

    info!("[ROUTE SETUP] Registering HTTP routes...");

    // Layers run outside-in from the last one added: CORS, stamping, logging, trace span.
    Router::new()
        .route("/api/prices", get(handlers::prices::get_prices))
        .route("/api/prices/{token}", get(handlers::prices::get_price))
        .route("/api/tokens", get(handlers::tokens::list_tokens))
        .route("/api/tokens/search", get(handlers::tokens::search_tokens))
        .route("/api/tokens/{address}", get(handlers::tokens::get_token))
        .route("/health", get(|| async { "OK" }))
        .fallback(|| async {
            info!("[404 HANDLER] Unmatched route - returning 404");
            (axum::http::StatusCode::NOT_FOUND, "Route not found")
        })
        .with_state(state)
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        request_id = %RequestStamp::id_of(request),
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::error!(
                            error = ?error,
                            latency_ms = latency.as_millis(),
                            "[HTTP FAILURE] Error: {:?}, Latency: {}ms",
                            error,
                            latency.as_millis()
                        );
                    },
                ),
        )
        .layer(axum::middleware::from_fn(log_requests))
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(cors)
}

/// Log server information
fn log_server_info() {
    info!(" PRICES:");
    info!("   • GET  /api/prices?tokens={{mint,mint}}&sources=coingecko,birdeye,jupiter,dexscreener");
    info!("   • GET  /api/prices/{{mint}}");
    info!(" TOKENS:");
    info!("   • GET  /api/tokens?search=&verified=true&limit=100&offset=0");
    info!("   • GET  /api/tokens/search?q={{query}}");
    info!("   • GET  /api/tokens/{{mint}}");
    info!(" HEALTH:");
    info!("   • GET  /health");
}
// endregion: --- Server Setup
