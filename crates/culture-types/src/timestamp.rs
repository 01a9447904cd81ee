//! Timestamp parsing shared by the record model and the kinetics engine.
//!
//! Records reach the core from several producers: RFC 3339 strings from the
//! API, the minute-precision `%Y-%m-%dT%H:%M` form used by the lab entry
//! forms, and a space-separated variant. Naive values
//! are interpreted as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Naive layouts accepted after RFC 3339 fails, tried in order.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A timestamp string matched none of the accepted layouts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unparseable timestamp: {value:?}")]
pub struct TimestampError {
    /// The rejected input.
    pub value: String,
}

/// Parse a timestamp string into a UTC instant.
///
/// # Errors
///
/// Returns [`TimestampError`] if the value matches no accepted layout.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimestampError {
            value: raw.to_owned(),
        })
}

/// Serialize as RFC 3339.
///
/// # Errors
///
/// Propagates the serializer's error.
pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339())
}

/// Deserialize any accepted layout via [`parse_timestamp`].
///
/// # Errors
///
/// Returns a custom deserializer error for unparseable values.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
