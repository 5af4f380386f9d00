//! Custom deserializers for the backend's JSON conventions.
//!
//! The backend serializes absent text fields as empty strings and
//! timestamps as local time without a zone designator.

use chrono::NaiveDateTime;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

/// Deserializes empty strings as `None` (for `String` fields).
pub fn deserialize_empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let result = Option::deserialize(deserializer);
    let s: Option<String> = result.map_err(D::Error::custom)?;
    Ok(s.filter(|s| !s.is_empty()))
}

/// Deserializes a backend timestamp (`2024-01-15T21:30:00`, optionally with
/// fractional seconds) into a `NaiveDateTime`.
pub fn deserialize_backend_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_backend_datetime(&s).map_err(D::Error::custom)
}

/// Parses a backend timestamp string.
///
/// # Errors
///
/// Returns an error if the string matches neither the plain nor the
/// fractional-seconds timestamp format.
pub fn parse_backend_datetime(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|e| format!("invalid backend timestamp {s:?}: {e}"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_backend_datetime_plain() {
        // Arrange & Act
        let dt = parse_backend_datetime("2024-01-15T21:30:00").unwrap();

        // Assert
        assert_eq!(dt.to_string(), "2024-01-15 21:30:00");
    }

    #[test]
    fn test_parse_backend_datetime_fractional() {
        // Arrange & Act
        let dt = parse_backend_datetime("2024-01-15T21:30:00.5").unwrap();

        // Assert
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-15 21:30:00");
    }

    #[test]
    fn test_parse_backend_datetime_invalid() {
        // Arrange & Act
        let result = parse_backend_datetime("15/01/2024 21:30");

        // Assert
        assert!(result.is_err());
    }
}
