//! The core data type shared across all feed sources.
//!
//! `NormalizedItem` represents a single hot entry from any upstream API.
//! Every source converts its native JSON into `NormalizedItem`s so the
//! renderer and the orchestrator can stay source-agnostic.
//!
//! ## For contributors
//!
//! If you are adding a new data source you do **not** need to modify this file.
//! Write a [`FieldRules`](super::FieldRules) table for your source instead;
//! [`JsonSource`](super::JsonSource) builds the items.

use chrono::{DateTime, Utc};

/// Title used when no candidate field yields any text.
pub const UNTITLED: &str = "Untitled";

/// A single feed entry, normalised from any data source.
///
/// Items are rendered in the order the adapter produced them; there is no
/// `Ord` impl because ordering policy belongs to the upstream.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NormalizedItem {
    /// Human-readable headline. Never empty.
    pub title: String,

    /// Absolute `http`/`https` URL to the full content.
    pub link: String,

    /// Identifier unique within the feed, used by readers for de-duplication.
    ///
    /// Prefixed with the source id (e.g. `v2ex-42`) when the upstream provides
    /// an item id.
    pub guid: String,

    /// Publication timestamp. Sources that omit one get the run start time.
    pub date: DateTime<Utc>,

    /// Longer description or excerpt. May be empty.
    pub description: String,
}
