//! # Web Library
//!
//! HTTP handlers, middleware, services and server start-up for the market
//! gateway.

pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;

pub use server::{create_router, start_server, AppState, ServerConfig};
