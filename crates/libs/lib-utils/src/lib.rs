//! # Utilities Library
//!
//! Shared utility functions for environment variables, time, and query validation.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_opt, get_env_or, get_env_parse, get_env_parse_or};
pub use time::{millis_to_utc, now_utc, now_millis};
pub use validation::{parse_csv, validate_not_empty};
