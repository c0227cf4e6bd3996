//! HTML summary of one run.
//!
//! One table row per feed, in registration order, with a shared generation
//! timestamp.  Feeds that failed this run are flagged instead of dropped so a
//! reader can tell fresh output from output left over from an earlier run.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use super::{date, xml};

const TITLE: &str = "Hot feeds";

/// Outcome of one feed as the index reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    /// Written this run.
    Fresh,
    /// Failed this run; a file from an earlier run is still being served.
    Stale(String),
    /// Failed this run and there is no file at all.
    Failed(String),
}

/// One index row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub title: String,
    /// Relative link to the feed file, when there is one to link to.
    pub href: Option<String>,
    pub item_count: usize,
    /// File size in bytes; 0 when it could not be determined.
    pub size: u64,
    pub status: EntryStatus,
}

/// Render the index page.
pub fn render(entries: &[IndexEntry], generated_at: DateTime<Utc>) -> String {
    let generated = date::iso8601(generated_at);
    let mut out = String::with_capacity(512 + entries.len() * 256);

    let _ = write!(
        out,
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{TITLE}</title>\n\
         </head>\n\
         <body>\n\
         <h1>{TITLE}</h1>\n\
         <table>\n\
         <thead>\n\
         <tr><th>Feed</th><th>Items</th><th>Size (bytes)</th><th>Generated</th><th>Status</th></tr>\n\
         </thead>\n\
         <tbody>\n"
    );

    for entry in entries {
        let feed = match &entry.href {
            Some(href) => format!(
                "<a href=\"{}\">{}</a>",
                xml::escape(href),
                xml::escape(&entry.title)
            ),
            None => xml::escape(&entry.title),
        };
        let status = match &entry.status {
            EntryStatus::Fresh => "ok".to_string(),
            EntryStatus::Stale(reason) => format!("stale: {}", xml::escape(reason)),
            EntryStatus::Failed(reason) => format!("failed: {}", xml::escape(reason)),
        };

        let _ = writeln!(
            out,
            "<tr><td>{feed}</td><td>{}</td><td>{}</td><td>{generated}</td><td>{status}</td></tr>",
            entry.item_count, entry.size
        );
    }

    out.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    out
}
