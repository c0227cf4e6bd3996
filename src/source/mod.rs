//! Data source abstraction layer.
//!
//! This module defines the [`DataSource`] trait and the common
//! [`NormalizedItem`] type.  Every upstream in this crate is a JSON API, so
//! the concrete implementation is the rule-driven [`JsonSource`]; the
//! per-upstream policy lives in [`zhihu`] and [`v2ex`].
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `lobsters.rs`) holding a
//!    [`FieldRules`] table and a constructor.
//! 2. Add `pub mod lobsters;` below.
//! 3. Register a `FeedDefinition` for it in `src/feeds.rs`.
//!
//! Fetching, rendering, and the index are all source-agnostic.
//! A source that is not a JSON API can implement [`DataSource`] directly.

pub mod extract;
mod item;
mod json;
pub mod v2ex;
pub mod zhihu;

// Re-export the public API of this module so callers can write
// `use crate::source::{DataSource, NormalizedItem, JsonSource};`
pub use item::{NormalizedItem, UNTITLED};
pub use json::{FieldRules, JsonSource};

use chrono::{DateTime, Utc};

use crate::error::SourceError;

/// Everything a source may need from the run besides its own configuration.
pub struct FetchContext<'a> {
    /// Shared HTTP client (carries the user agent, headers and timeout).
    pub client: &'a reqwest::blocking::Client,
    /// The owning feed's channel link, used when an item has no usable link.
    pub channel_link: &'a str,
    /// Run start time, used when an item has no usable timestamp.
    pub now: DateTime<Utc>,
}

/// Trait that every data source must implement.
///
/// The orchestrator may call [`fetch()`](DataSource::fetch) from worker
/// threads when running in parallel, so implementations must be [`Send`] and
/// [`Sync`].
///
/// ## Implementing a new source
///
/// ```ignore
/// pub struct MySource { /* config fields */ }
///
/// impl DataSource for MySource {
///     fn name(&self) -> &str { "my-source" }
///
///     fn fetch(&self, ctx: &FetchContext<'_>) -> Result<Vec<NormalizedItem>, SourceError> {
///         // Perform HTTP / IO, then convert into NormalizedItem values.
///         todo!()
///     }
/// }
/// ```
pub trait DataSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Fetch the latest batch of items.
    ///
    /// Only transport, HTTP status and JSON syntax problems are errors.
    /// Shape problems inside a valid payload must degrade to fallbacks.
    fn fetch(&self, ctx: &FetchContext<'_>) -> Result<Vec<NormalizedItem>, SourceError>;
}
