//! Serde helpers for backend timestamps.
//!
//! The backend stores naive UTC datetimes and renders them without an offset
//! (`2025-08-01T23:59:00`), while values echoed back from a request keep
//! theirs (`2025-08-01T23:59:00Z`). Both forms deserialize to `DateTime<Utc>`;
//! serialization always writes RFC 3339 with a `Z` suffix.
//!
//! ```rust
//! use chrono::{DateTime, Utc};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Row {
//!     #[serde(with = "classroom_core::timestamp")]
//!     at: DateTime<Utc>,
//! }
//!
//! let row: Row = serde_json::from_str(r#"{"at":"2025-08-01T23:59:00"}"#).unwrap();
//! assert_eq!(row.at.to_rfc3339(), "2025-08-01T23:59:00+00:00");
//! ```

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

/// Parse a backend timestamp, with or without an offset.
///
/// # Errors
///
/// Returns the RFC 3339 parse error if the value matches neither form.
pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(rfc_err) => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
            .map(|naive| naive.and_utc())
            .map_err(|_| rfc_err),
    }
}

/// Serialize as RFC 3339 in UTC.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Deserialize from RFC 3339 or a naive ISO-8601 datetime (taken as UTC).
///
/// # Errors
///
/// Fails if the value is not a string in either form.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn test_parse_naive_as_utc() {
        let dt = parse("2025-08-01T23:59:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 8, 1));
        assert_eq!((dt.hour(), dt.minute()), (23, 59));
    }

    #[test]
    fn test_parse_naive_with_fraction() {
        let dt = parse("2025-07-15T08:30:12.345678").unwrap();
        assert_eq!(dt.nanosecond(), 345_678_000);
    }

    #[test]
    fn test_parse_offset_converts_to_utc() {
        let dt = parse("2025-08-01T23:59:00+02:00").unwrap();
        assert_eq!(dt.hour(), 21);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("next tuesday").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_serialize_uses_z_suffix() {
        let dt = parse("2025-08-01T23:59:00").unwrap();
        let mut out = Vec::new();
        serialize(&dt, &mut serde_json::Serializer::new(&mut out)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\"2025-08-01T23:59:00Z\"");
    }
}
