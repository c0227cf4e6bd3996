//! Timestamp formats used in generated documents.

use chrono::{DateTime, SecondsFormat, Utc};

/// RFC 822 date as RSS `pubDate` / `lastBuildDate` expect, e.g.
/// `Tue, 14 Nov 2023 22:13:20 +0000`.
pub fn rfc822(at: DateTime<Utc>) -> String {
    at.to_rfc2822()
}

/// ISO 8601 with second precision and a `Z` suffix, e.g.
/// `2023-11-14T22:13:20Z`.
pub fn iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
