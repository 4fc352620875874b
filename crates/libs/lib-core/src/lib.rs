//! # Core Library
//!
//! Configuration, error type and market DTOs shared by the market gateway crates.

pub mod config;
pub mod error;
pub mod dto;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
