//! Time parsing and formatting utilities for Namu service datetime strings

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Naive layouts the service has been seen to emit. Stored values are UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// Format used by the timer's manual start/end fields
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parse a timestamp as sent by the service.
///
/// Accepts HTTP dates ("Mon, 16 Feb 2026 23:17:39 GMT", which is how the
/// service's JSON encoder writes datetimes), RFC 3339 with or without a colon
/// in the offset, and naive SQL-style timestamps which are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let normalized = normalize_timezone_offset(raw);
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// ISO-8601 in UTC with millisecond precision and a `Z` suffix,
/// e.g. "2026-02-16T23:17:39.000Z"
pub fn to_iso_utc(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a "YYYY-MM-DDTHH:MM" value typed by the user in the given zone
pub fn parse_input<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), INPUT_FORMAT).ok()?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Render a timestamp for the manual start/end fields
pub fn to_input<Tz: TimeZone>(dt: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.with_timezone(tz).format(INPUT_FORMAT).to_string()
}

/// Normalize timezone offset from "+0800" to "+08:00" format for chrono parsing
fn normalize_timezone_offset(started: &str) -> String {
    if started.len() > 5 {
        let bytes = started.as_bytes();
        let len = bytes.len();
        if (bytes[len - 5] == b'+' || bytes[len - 5] == b'-')
            && bytes[len - 4..].iter().all(u8::is_ascii_digit)
        {
            return format!("{}:{}", &started[..len - 2], &started[len - 2..]);
        }
    }
    started.to_string()
}

/// Serde adapter for service timestamps: lenient on the way in, ISO UTC on the way out
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_iso_utc(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("unrecognised timestamp: {raw}")))
    }
}
