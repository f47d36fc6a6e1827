//! # Temporal Types
//!
//! `Timestamp` is a UTC instant truncated to whole seconds. Documents carry
//! dates as ISO-8601 strings (`issuanceDate`, `expirationDate`, proof
//! `created`); this module is where those strings become instants.
//!
//! Output is always `YYYY-MM-DDTHH:MM:SSZ`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimestampError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`]: current UTC time, truncated.
/// - [`Timestamp::from_utc()`]: from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`]: strict, `Z` suffix only.
/// - [`Timestamp::parse_lenient()`]: any ISO-8601 form found in the wild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 timestamp that ends in `Z`.
    ///
    /// Explicit offsets, including `+00:00`, are rejected.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        if !s.ends_with('Z') {
            return Err(TimestampError::NotUtc(s.to_string()));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TimestampError::Invalid {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Parse any of the ISO-8601 shapes credentials are issued with.
    ///
    /// Accepted, in order:
    /// 1. RFC 3339 with any offset (converted to UTC).
    /// 2. A naive date-time `YYYY-MM-DDTHH:MM:SS[.fff]`, read as UTC.
    /// 3. A bare date `YYYY-MM-DD`, read as midnight UTC.
    pub fn parse_lenient(s: &str) -> Result<Self, TimestampError> {
        let trimmed = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self(truncate_to_seconds(naive.and_utc())));
        }
        match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Self(naive.and_utc()))
                .ok_or_else(|| TimestampError::Invalid {
                    value: s.to_string(),
                    reason: "date has no midnight".to_string(),
                }),
            Err(e) => Err(TimestampError::Invalid {
                value: s.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, TimestampError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or(TimestampError::OutOfRange(secs))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_utc(dt)
    }
}

/// Parse an optional date field where an empty string means "not set".
///
/// Returns `Ok(None)` for `None`, `""` and whitespace-only input.
pub fn parse_optional_date(value: Option<&str>) -> Result<Option<Timestamp>, TimestampError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Timestamp::parse_lenient(s).map(Some),
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 45).unwrap();
        let ts = Timestamp::from_utc(dt.with_nanosecond(123_456_789).unwrap());
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:30:45Z");
    }

    #[test]
    fn strict_parse_requires_z() {
        assert!(Timestamp::parse("2026-01-15T12:00:00Z").is_ok());
        assert_eq!(
            Timestamp::parse("2026-01-15T12:00:00+00:00"),
            Err(TimestampError::NotUtc("2026-01-15T12:00:00+00:00".to_string()))
        );
    }

    #[test]
    fn lenient_parse_converts_offsets() {
        let ts = Timestamp::parse_lenient("2026-01-15T17:00:00+05:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn lenient_parse_accepts_fractional_seconds() {
        let ts = Timestamp::parse_lenient("2024-03-01T10:11:12.345Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-03-01T10:11:12Z");
    }

    #[test]
    fn lenient_parse_reads_naive_as_utc() {
        let ts = Timestamp::parse_lenient("2024-03-01T10:11:12").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-03-01T10:11:12Z");
    }

    #[test]
    fn lenient_parse_accepts_bare_date() {
        let ts = Timestamp::parse_lenient("2024-01-01").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn lenient_parse_rejects_garbage() {
        assert!(matches!(
            Timestamp::parse_lenient("now"),
            Err(TimestampError::Invalid { .. })
        ));
    }

    #[test]
    fn optional_date_treats_empty_as_unset() {
        assert_eq!(parse_optional_date(None), Ok(None));
        assert_eq!(parse_optional_date(Some("")), Ok(None));
        assert_eq!(parse_optional_date(Some("  ")), Ok(None));
        assert!(parse_optional_date(Some("2030-01-01T00:00:00Z")).unwrap().is_some());
        assert!(parse_optional_date(Some("soon")).is_err());
    }

    #[test]
    fn epoch_roundtrip() {
        let ts = Timestamp::from_epoch_secs(1_700_000_000).unwrap();
        assert_eq!(ts.epoch_secs(), 1_700_000_000);
        assert!(Timestamp::from_epoch_secs(i64::MAX).is_err());
    }

    #[test]
    fn ordering_follows_time() {
        let a = Timestamp::parse("2024-01-01T00:00:00Z").unwrap();
        let b = Timestamp::parse("2024-01-02T00:00:00Z").unwrap();
        assert!(a < b);
    }
}
