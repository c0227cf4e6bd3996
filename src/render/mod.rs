//! Text output: RSS documents and the HTML index.
//!
//! Renderers are pure functions of their inputs (including the timestamp to
//! print), so they never fail and the same inputs always give the same bytes.

pub mod date;
pub mod index;
pub mod rss;
pub mod xml;

pub use index::{EntryStatus, IndexEntry};
pub use rss::Channel;
