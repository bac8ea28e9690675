//! Lenient timestamp decoding. Older records store `createdAt` as a bare
//! `YYYY-MM-DD` date instead of a full RFC 3339 timestamp.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Accepts RFC 3339, a zone-less date-time (read as UTC) or a bare date
/// (midnight UTC).
pub fn parse_lenient(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `deserialize_with` adapter for [`parse_lenient`].
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_lenient(&raw).ok_or_else(|| D::Error::custom(format!("unrecognised timestamp `{raw}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accepts_full_naive_and_date_only_forms() {
        let midnight = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(parse_lenient("2025-01-02"), Some(midnight));
        assert_eq!(parse_lenient("2025-01-02T00:00:00Z"), Some(midnight));
        assert_eq!(parse_lenient("2025-01-02T01:00:00+01:00"), Some(midnight));
        assert_eq!(parse_lenient("2025-01-02T00:00:00.000"), Some(midnight));
        assert_eq!(parse_lenient("yesterday"), None);
    }
}
