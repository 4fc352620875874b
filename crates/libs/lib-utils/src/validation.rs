//! # Validation Utilities
//!
//! Input validation helpers for query parameters.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Split a comma-separated query value into trimmed, non-empty entries.
pub fn parse_csv(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_drops_blank_entries() {
        let parsed = parse_csv(Some(" So111 ,, EPjF ,"));
        assert_eq!(parsed, vec!["So111".to_string(), "EPjF".to_string()]);
    }

    #[test]
    fn test_parse_csv_missing_value() {
        assert!(parse_csv(None).is_empty());
        assert!(parse_csv(Some("")).is_empty());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("q", "q").is_ok());
        assert_eq!(validate_not_empty("  ", "q").unwrap_err(), "q cannot be empty");
    }
}
