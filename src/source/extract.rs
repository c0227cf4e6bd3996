//! Total accessors over untyped JSON payloads.
//!
//! Upstream schemas drift without notice, so nothing in this module fails:
//! every accessor returns `None` when a value is missing or has the wrong
//! shape, and the caller moves on to the next [`Rule`] or to a fallback.
//!
//! ## For contributors
//!
//! Source adapters describe each logical field as an ordered slice of rules
//! built from these helpers, e.g.
//!
//! ```ignore
//! fn plain_title(item: &Value) -> Option<String> {
//!     extract::text_at(item, &["title"])
//! }
//! ```
//!
//! and [`first_match`] picks the first rule that yields a value.

use chrono::{DateTime, Utc};
use serde_json::Value;
use url::Url;

use crate::render::xml;

/// One extraction rule: a projection that yields `None` when it does not apply.
pub type Rule<T> = fn(&Value) -> Option<T>;

/// Epoch values at or above this are milliseconds rather than seconds.
///
/// `10^11` seconds is past the year 5000, while `10^11` milliseconds is
/// early 1973, so the two ranges do not overlap for real data.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Evaluate `rules` in order and return the first value produced.
pub fn first_match<T>(value: &Value, rules: &[Rule<T>]) -> Option<T> {
    rules.iter().find_map(|rule| rule(value))
}

/// Follow object keys from `value`. An empty path yields `value` itself.
pub fn at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

/// The first array found at any of `paths`.
pub fn list<'a>(value: &'a Value, paths: &[&[&str]]) -> Option<&'a [Value]> {
    paths
        .iter()
        .find_map(|path| at(value, path).and_then(Value::as_array))
        .map(Vec::as_slice)
}

/// A trimmed, non-empty string.
///
/// Characters XML 1.0 cannot carry are removed first, so a value made only
/// of control characters counts as missing.
pub fn text(value: &Value) -> Option<String> {
    let raw = value.as_str()?;
    let cleaned: String = raw.chars().filter(|&c| xml::is_xml_char(c)).collect();
    let s = cleaned.trim();
    (!s.is_empty()).then(|| s.to_string())
}

pub fn text_at(value: &Value, path: &[&str]) -> Option<String> {
    at(value, path).and_then(text)
}

/// An item identifier: an integer, or a string of URL-unreserved characters
/// (ASCII letters, digits, `-`, `.`, `_`, `~`).
///
/// Identifiers end up inside GUIDs and URL templates, so anything that would
/// need escaping there is rejected.
pub fn ident(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty() && s.chars().all(is_unreserved)).then(|| s.to_string())
        }
        _ => None,
    }
}

/// An identifier made only of ASCII digits.
pub fn numeric_ident(value: &Value) -> Option<String> {
    ident(value).filter(|id| id.bytes().all(|b| b.is_ascii_digit()))
}

pub fn numeric_ident_at(value: &Value, path: &[&str]) -> Option<String> {
    at(value, path).and_then(numeric_ident)
}

fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

pub fn ident_at(value: &Value, path: &[&str]) -> Option<String> {
    at(value, path).and_then(ident)
}

/// Validate `raw` as an absolute web URL.
///
/// Protocol-relative links (`//host/path`) are upgraded to `https:`. The
/// returned string is the trimmed input, not a re-serialized [`Url`], so a
/// valid upstream link comes through byte-for-byte.
pub fn absolute_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let candidate = if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.to_string()
    };
    if candidate.is_empty() || candidate.contains(char::is_whitespace) {
        return None;
    }

    let parsed = Url::parse(&candidate).ok()?;
    let is_web = matches!(parsed.scheme(), "http" | "https")
        && parsed.host_str().is_some_and(|host| !host.is_empty());
    is_web.then_some(candidate)
}

pub fn url_at(value: &Value, path: &[&str]) -> Option<String> {
    text_at(value, path).and_then(|raw| absolute_url(&raw))
}

/// Interpret `value` as a point in time.
///
/// Accepts epoch numbers (seconds or milliseconds, see [`MILLIS_THRESHOLD`]),
/// numeric strings, and RFC 3339 strings. Zero and negative epochs are
/// treated as missing.
pub fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(from_epoch),
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(n) => from_epoch(n),
                Err(_) => DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc)),
            }
        }
        _ => None,
    }
}

pub fn timestamp_at(value: &Value, path: &[&str]) -> Option<DateTime<Utc>> {
    at(value, path).and_then(timestamp)
}

fn from_epoch(raw: i64) -> Option<DateTime<Utc>> {
    if raw <= 0 {
        None
    } else if raw >= MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(raw)
    } else {
        DateTime::from_timestamp(raw, 0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
