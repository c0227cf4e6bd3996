//! V2EX hot topics.
//!
//! The endpoint returns a bare JSON array of topic objects:
//!
//! ```text
//! [{"id": 42, "title": "…", "url": "https://www.v2ex.com/t/42",
//!   "content": "…", "content_rendered": "…", "created": 1700000000,
//!   "last_modified": 1700000100, "last_touched": 1700000200, …}]
//! ```

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::extract;
use super::{FieldRules, JsonSource};

pub const ID: &str = "v2ex";
pub const ENDPOINT: &str = "https://www.v2ex.com/api/topics/hot.json";

fn id(topic: &Value) -> Option<String> {
    extract::ident_at(topic, &["id"])
}

fn title(topic: &Value) -> Option<String> {
    extract::text_at(topic, &["title"])
}

fn url(topic: &Value) -> Option<String> {
    extract::url_at(topic, &["url"])
}

fn created(topic: &Value) -> Option<DateTime<Utc>> {
    extract::timestamp_at(topic, &["created"])
}

fn last_modified(topic: &Value) -> Option<DateTime<Utc>> {
    extract::timestamp_at(topic, &["last_modified"])
}

fn last_touched(topic: &Value) -> Option<DateTime<Utc>> {
    extract::timestamp_at(topic, &["last_touched"])
}

fn content(topic: &Value) -> Option<String> {
    extract::text_at(topic, &["content"])
}

fn content_rendered(topic: &Value) -> Option<String> {
    extract::text_at(topic, &["content_rendered"])
}

pub static RULES: FieldRules = FieldRules {
    items: &[&[], &["topics"]],
    id: &[id],
    title: &[title],
    link: &[url],
    link_id: &[id],
    link_template: "https://www.v2ex.com/t/{id}",
    date: &[created, last_modified, last_touched],
    description: &[content, content_rendered],
};

pub fn source() -> JsonSource {
    source_at(ENDPOINT)
}

/// Same rules against a different endpoint (mirrors, test servers).
pub fn source_at(endpoint: impl Into<String>) -> JsonSource {
    JsonSource::new(ID, endpoint, &RULES)
}
