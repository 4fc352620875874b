//! # Environment Variables
//!
//! Utilities for reading and parsing environment variables.

use std::env;
use std::str::FromStr;

/// Get an environment variable by name.
pub fn get_env(name: &'static str) -> Result<String, Error> {
    env::var(name).map_err(|_| Error::MissingEnv(name))
}

/// Get an environment variable, treating unset and blank values as absent.
pub fn get_env_opt(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable or fall back to `default`.
pub fn get_env_or(name: &'static str, default: &str) -> String {
    get_env_opt(name).unwrap_or_else(|| default.to_string())
}

/// Get and parse an environment variable.
pub fn get_env_parse<T: FromStr>(name: &'static str) -> Result<T, Error> {
    let val = get_env(name)?;
    val.trim().parse::<T>().map_err(|_| Error::WrongFormat(name))
}

/// Parse an environment variable when it is set, otherwise return `default`.
///
/// A value that is set but unparsable is still an error.
pub fn get_env_parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, Error> {
    match get_env_opt(name) {
        Some(val) => val.trim().parse::<T>().map_err(|_| Error::WrongFormat(name)),
        None => Ok(default),
    }
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    MissingEnv(&'static str),
    WrongFormat(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable name so parallel tests don't interfere.

    #[test]
    fn test_get_env_parse_or_uses_default_when_unset() {
        std::env::remove_var("LIB_UTILS_TEST_UNSET");
        let value: u64 = get_env_parse_or("LIB_UTILS_TEST_UNSET", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_get_env_parse_or_rejects_garbage() {
        std::env::set_var("LIB_UTILS_TEST_GARBAGE", "not-a-number");
        let result: Result<u64, Error> = get_env_parse_or("LIB_UTILS_TEST_GARBAGE", 1);
        assert!(matches!(result, Err(Error::WrongFormat("LIB_UTILS_TEST_GARBAGE"))));
    }

    #[test]
    fn test_get_env_opt_treats_blank_as_absent() {
        std::env::set_var("LIB_UTILS_TEST_BLANK", "   ");
        assert_eq!(get_env_opt("LIB_UTILS_TEST_BLANK"), None);
        assert_eq!(get_env_or("LIB_UTILS_TEST_BLANK", "fallback"), "fallback");
    }
}
