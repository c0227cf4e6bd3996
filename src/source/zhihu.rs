//! Zhihu hot list.
//!
//! Items live under `data`, each wrapping the actual question in `target`:
//!
//! ```text
//! {"data": [{"id": "0_1700000000.1", "detail_text": "1024 万热度",
//!            "target": {"id": 123, "title": "…", "excerpt": "…",
//!                       "url": "https://api.zhihu.com/questions/123",
//!                       "created": 1700000000}}]}
//! ```
//!
//! `target.url` points at the API rather than the website, so it is
//! rewritten to the public page before the generic URL rules get a chance.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::extract;
use super::{FieldRules, JsonSource};

pub const ID: &str = "zhihu";
pub const ENDPOINT: &str = "https://api.zhihu.com/topstory/hot-lists/total?limit=50";

/// API path prefix → public page prefix.
const API_PAGES: &[(&str, &str)] = &[
    ("questions/", "https://www.zhihu.com/question/"),
    ("articles/", "https://zhuanlan.zhihu.com/p/"),
];

const API_HOSTS: &[&str] = &["https://api.zhihu.com/", "http://api.zhihu.com/"];

/// Map an `api.zhihu.com` object URL to its public page.
fn public_page(api_url: &str) -> Option<String> {
    let rest = API_HOSTS
        .iter()
        .find_map(|host| api_url.strip_prefix(host))?
        .trim_end_matches('/');

    API_PAGES.iter().find_map(|(api_prefix, page_prefix)| {
        let id = rest.strip_prefix(api_prefix)?;
        (!id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
            .then(|| format!("{page_prefix}{id}"))
    })
}

fn id(item: &Value) -> Option<String> {
    extract::ident_at(item, &["target", "id"])
}

/// Question pages are addressed by the numeric target id only.
fn question_id(item: &Value) -> Option<String> {
    extract::numeric_ident_at(item, &["target", "id"])
}

/// Hot-list card id (e.g. `0_1700000000.1`); unique, but not a page address.
fn card_id(item: &Value) -> Option<String> {
    extract::ident_at(item, &["id"])
}

fn target_title(item: &Value) -> Option<String> {
    extract::text_at(item, &["target", "title"])
}

fn question_title(item: &Value) -> Option<String> {
    extract::text_at(item, &["target", "question", "title"])
}

fn plain_title(item: &Value) -> Option<String> {
    extract::text_at(item, &["title"])
}

fn query(item: &Value) -> Option<String> {
    extract::text_at(item, &["query"])
}

fn link_url(item: &Value) -> Option<String> {
    extract::url_at(item, &["target", "link", "url"])
}

fn api_page(item: &Value) -> Option<String> {
    extract::text_at(item, &["target", "url"])
        .or_else(|| extract::text_at(item, &["url"]))
        .and_then(|api| public_page(&api))
}

fn web_url(item: &Value) -> Option<String> {
    extract::url_at(item, &["target", "url"])
        .or_else(|| extract::url_at(item, &["url"]))
        .filter(|url| !API_HOSTS.iter().any(|host| url.starts_with(host)))
}

fn target_created(item: &Value) -> Option<DateTime<Utc>> {
    extract::timestamp_at(item, &["target", "created"])
}

fn created(item: &Value) -> Option<DateTime<Utc>> {
    extract::timestamp_at(item, &["created"])
}

fn updated(item: &Value) -> Option<DateTime<Utc>> {
    extract::timestamp_at(item, &["target", "updated_time"])
}

fn excerpt(item: &Value) -> Option<String> {
    extract::text_at(item, &["target", "excerpt"])
}

fn detail_text(item: &Value) -> Option<String> {
    extract::text_at(item, &["detail_text"])
}

fn plain_excerpt(item: &Value) -> Option<String> {
    extract::text_at(item, &["excerpt"])
}

pub static RULES: FieldRules = FieldRules {
    items: &[&["data"], &[]],
    id: &[id, card_id],
    title: &[target_title, question_title, plain_title, query],
    link: &[link_url, api_page, web_url],
    link_id: &[question_id],
    link_template: "https://www.zhihu.com/question/{id}",
    date: &[target_created, created, updated],
    description: &[excerpt, detail_text, plain_excerpt],
};

pub fn source() -> JsonSource {
    source_at(ENDPOINT)
}

/// Same rules against a different endpoint (mirrors, test servers).
pub fn source_at(endpoint: impl Into<String>) -> JsonSource {
    JsonSource::new(ID, endpoint, &RULES)
}
