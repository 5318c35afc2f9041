//! Timestamp helpers built on chrono.
//!
//! The sitemap needs three distinct renderings of a UTC instant:
//! - ISO-8601 with explicit offset for `news:publication_date`
//! - RFC 7231 format for `Last-Modified` / `Expires` headers
//! - fractional age in days for priority decay

use chrono::{DateTime, Utc};

/// Format for ISO-8601 with numeric offset (`2026-08-28T10:00:00+00:00`).
///
/// Matches the `news:publication_date` shape Google News documents.
pub fn iso8601(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Format for HTTP date headers (`Fri, 29 Aug 2026 10:00:00 GMT`).
pub fn http_date(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Age of `t` relative to `now`, in fractional days.
///
/// Negative for future-dated timestamps; callers clamp as needed.
pub fn age_days(t: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - t).num_seconds() as f64 / 86_400.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_iso8601_utc_offset() {
        let t = Utc.with_ymd_and_hms(2026, 8, 28, 10, 0, 0).unwrap();
        assert_eq!(iso8601(t), "2026-08-28T10:00:00+00:00");
    }

    #[test]
    fn test_http_date() {
        let t = Utc.with_ymd_and_hms(2026, 8, 28, 10, 0, 0).unwrap();
        assert_eq!(http_date(t), "Fri, 28 Aug 2026 10:00:00 GMT");
    }

    #[test]
    fn test_age_days() {
        let now = at("2026-08-28T12:00:00Z");
        assert_eq!(age_days(at("2026-08-27T12:00:00Z"), now), 1.0);
        assert_eq!(age_days(at("2026-08-28T00:00:00Z"), now), 0.5);
        // Future-dated: negative
        assert!(age_days(at("2026-08-29T12:00:00Z"), now) < 0.0);
    }
}
