//! RSS 2.0 document rendering.
//!
//! ## For contributors
//!
//! The layout is fixed and written by hand rather than through a builder so
//! that the output is byte-for-byte predictable:
//!
//! * `<?xml …?>` declaration, `<rss version="2.0">`, one `<channel>`.
//! * Channel `title`, `link`, `description`, then `lastBuildDate` (the render
//!   time, not any item's time).
//! * One `<item>` per input item, **in input order**, each with `title`,
//!   `link`, `guid`, `pubDate` and `description`.
//!
//! Every text node goes through [`xml::escape`](super::xml::escape).

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use super::{date, xml};
use crate::source::NormalizedItem;

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Channel-level metadata.
#[derive(Debug, Clone, Copy)]
pub struct Channel<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub description: &'a str,
}

/// Render a complete RSS 2.0 document.
pub fn render(channel: &Channel<'_>, items: &[NormalizedItem], built_at: DateTime<Utc>) -> String {
    let mut out = String::with_capacity(512 + items.len() * 512);

    out.push_str(DECLARATION);
    out.push_str("\n<rss version=\"2.0\">\n  <channel>\n");
    element(&mut out, 4, "title", channel.title);
    element(&mut out, 4, "link", channel.link);
    element(&mut out, 4, "description", channel.description);
    element(&mut out, 4, "lastBuildDate", &date::rfc822(built_at));

    for item in items {
        out.push_str("    <item>\n");
        element(&mut out, 6, "title", &item.title);
        element(&mut out, 6, "link", &item.link);
        element(&mut out, 6, "guid", &item.guid);
        element(&mut out, 6, "pubDate", &date::rfc822(item.date));
        element(&mut out, 6, "description", &item.description);
        out.push_str("    </item>\n");
    }

    out.push_str("  </channel>\n</rss>\n");
    out
}

fn element(out: &mut String, indent: usize, name: &str, text: &str) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{:indent$}<{name}>{}</{name}>", "", xml::escape(text));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
