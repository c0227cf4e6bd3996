//! hotfeeds — turns "hot item" lists from JSON APIs into RSS 2.0 feeds.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐ FeedDefinition ┌──────────┐  fetch()  ┌────────────┐
//! │ feeds.rs │ ─────────────► │  run.rs  │ ────────► │  source/   │
//! │(registry)│                │ (orch.)  │ ◄──────── │ (adapters) │
//! └──────────┘                └──────────┘   items   └────────────┘
//!                                  │ render()
//!                                  ▼
//!                             ┌──────────┐
//!                             │ render/  │  rss.rs → <feed>.xml
//!                             │          │  index.rs → index.html
//!                             └──────────┘
//! ```
//!
//! * **`source/`** — the `DataSource` trait, the rule-driven `JsonSource`,
//!   and the Zhihu / V2EX rule tables.
//! * **`feeds`** — the static list of feeds a run produces.
//! * **`run`** — processes each feed behind its own failure boundary, writes
//!   files atomically, then writes the index.
//! * **`render`** — pure text output: escaping, dates, RSS, HTML.
//! * **`http`**, **`config`**, **`error`** — shared plumbing.

pub mod config;
pub mod error;
pub mod feeds;
pub mod http;
pub mod render;
pub mod run;
pub mod source;
