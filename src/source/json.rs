//! Generic JSON API source.
//!
//! Every upstream this crate knows about is "one GET returning JSON with a
//! list of items somewhere inside it".  [`JsonSource`] does the HTTP and JSON
//! work once; what differs per upstream is captured as data in a
//! [`FieldRules`] table.
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file under `src/source/` (e.g. `hackernews.rs`).
//! 2. Write one small accessor function per candidate field and list them, in
//!    priority order, in a `static RULES: FieldRules`.
//! 3. Expose a constructor returning `JsonSource::new(id, endpoint, &RULES)`.
//! 4. Register a [`FeedDefinition`](crate::feeds::FeedDefinition) for it in
//!    `src/feeds.rs`.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::extract::{self, Rule};
use super::item::UNTITLED;
use super::{DataSource, FetchContext, NormalizedItem};
use crate::error::SourceError;
use crate::http;

/// Per-source extraction policy.
///
/// Each field is an ordered list of rules evaluated first-match-wins; a field
/// whose rules all miss falls back to the documented default.
pub struct FieldRules {
    /// Candidate paths to the item array. An empty path is the payload root.
    pub items: &'static [&'static [&'static str]],
    pub id: &'static [Rule<String>],
    pub title: &'static [Rule<String>],
    /// Rules here must already return absolute URLs (see [`extract::url_at`]).
    pub link: &'static [Rule<String>],
    /// Identifier substituted into `link_template`. Kept apart from `id`
    /// because not every GUID-worthy id addresses a public page.
    pub link_id: &'static [Rule<String>],
    /// Link synthesized from `link_id`; `{id}` is replaced.
    pub link_template: &'static str,
    pub date: &'static [Rule<DateTime<Utc>>],
    pub description: &'static [Rule<String>],
}

/// A source backed by a single JSON endpoint.
pub struct JsonSource {
    /// Short stable identifier, used as the GUID prefix.
    pub id: String,
    /// Full URL of the JSON endpoint.
    pub endpoint: String,
    rules: &'static FieldRules,
}

impl JsonSource {
    pub fn new(
        id: impl Into<String>,
        endpoint: impl Into<String>,
        rules: &'static FieldRules,
    ) -> Self {
        Self {
            id: id.into(),
            endpoint: endpoint.into(),
            rules,
        }
    }

    /// Map an already-fetched payload to items.
    ///
    /// This is a pure function (no I/O) so that tests can exercise the
    /// normalization without hitting the network.  It never fails: a missing
    /// item list yields an empty `Vec`, and each item is built independently.
    pub fn normalize(
        &self,
        payload: &Value,
        channel_link: &str,
        now: DateTime<Utc>,
    ) -> Vec<NormalizedItem> {
        let Some(raw_items) = extract::list(payload, self.rules.items) else {
            tracing::warn!(source = %self.id, "no item list in payload, treating as empty");
            return Vec::new();
        };

        raw_items
            .iter()
            .enumerate()
            .map(|(position, raw)| self.normalize_item(raw, position, channel_link, now))
            .collect()
    }

    fn normalize_item(
        &self,
        raw: &Value,
        position: usize,
        channel_link: &str,
        now: DateTime<Utc>,
    ) -> NormalizedItem {
        let rules = self.rules;
        let id = extract::first_match(raw, rules.id);

        let own_link = extract::first_match(raw, rules.link).or_else(|| {
            extract::first_match(raw, rules.link_id)
                .and_then(|id| extract::absolute_url(&rules.link_template.replace("{id}", &id)))
        });

        // `#` never appears in an ident, so positional guids cannot collide
        // with id-based ones.
        let guid = match (&id, &own_link) {
            (Some(id), _) => format!("{}-{}", self.id, id),
            (None, Some(link)) => link.clone(),
            (None, None) => format!("{}#{}", self.id, position + 1),
        };

        NormalizedItem {
            title: extract::first_match(raw, rules.title)
                .unwrap_or_else(|| UNTITLED.to_string()),
            link: own_link.unwrap_or_else(|| channel_link.to_string()),
            guid,
            date: extract::first_match(raw, rules.date).unwrap_or(now),
            description: extract::first_match(raw, rules.description).unwrap_or_default(),
        }
    }
}

impl DataSource for JsonSource {
    fn name(&self) -> &str {
        &self.id
    }

    fn fetch(&self, ctx: &FetchContext<'_>) -> Result<Vec<NormalizedItem>, SourceError> {
        let payload = http::get_json(ctx.client, &self.endpoint)?;
        let items = self.normalize(&payload, ctx.channel_link, ctx.now);
        tracing::debug!(source = %self.id, items = items.len(), "normalized payload");
        Ok(items)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
