//! One complete run: every feed, then the index.
//!
//! ## For contributors
//!
//! Each feed is processed behind its own failure boundary: fetch, parse,
//! write and even adapter panics turn into a [`FeedStatus::Failed`] entry and
//! a log line, and the next feed proceeds.  The only error that escapes
//! [`run`] is being unable to create the output directory.
//!
//! Files are written to a temporary sibling and renamed into place, so a feed
//! that fails (or a write that dies halfway) leaves the previous run's file
//! intact and servable.

use std::any::Any;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::thread;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;

use crate::config::Settings;
use crate::error::{FeedError, RunError};
use crate::feeds::FeedDefinition;
use crate::render::{self, EntryStatus, IndexEntry};
use crate::source::FetchContext;

/// Per-feed outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    Written,
    Failed(String),
}

/// What happened to one feed during a run.
pub struct FeedResult<'a> {
    pub feed: &'a FeedDefinition,
    /// Where the feed's document lives (or would have been written).
    pub path: PathBuf,
    /// Items written; 0 for failed feeds.
    pub item_count: usize,
    pub status: FeedStatus,
}

impl FeedResult<'_> {
    pub fn is_written(&self) -> bool {
        self.status == FeedStatus::Written
    }
}

/// Summary of a whole run.
pub struct RunReport<'a> {
    pub generated_at: DateTime<Utc>,
    /// One result per feed, in registration order.
    pub results: Vec<FeedResult<'a>>,
    /// `None` if the index could not be written.
    pub index_path: Option<PathBuf>,
}

/// Fetch, render and write every feed, then write the index.
pub fn run<'a>(
    feeds: &'a [FeedDefinition],
    client: &Client,
    settings: &Settings,
) -> Result<RunReport<'a>, RunError> {
    let dir = settings.output_dir.as_path();
    fs::create_dir_all(dir).map_err(|source| RunError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let started = Utc::now();
    tracing::info!(
        feeds = feeds.len(),
        output = %dir.display(),
        parallel = settings.parallel,
        "starting run"
    );

    let results = if settings.parallel {
        process_parallel(feeds, client, dir, started)
    } else {
        feeds
            .iter()
            .map(|feed| process_feed(feed, client, dir, started))
            .collect()
    };

    let generated_at = Utc::now();
    let entries: Vec<IndexEntry> = results.iter().map(index_entry).collect();
    let html = render::index::render(&entries, generated_at);

    let index_path = settings.index_path();
    let index_path = match write_atomic(&index_path, html.as_bytes()) {
        Ok(()) => {
            tracing::info!(path = %index_path.display(), "index written");
            Some(index_path)
        }
        Err(e) => {
            tracing::error!(path = %index_path.display(), error = %e, "cannot write index");
            None
        }
    };

    let written = results.iter().filter(|r| r.is_written()).count();
    tracing::info!(written, failed = results.len() - written, "run finished");

    Ok(RunReport {
        generated_at,
        results,
        index_path,
    })
}

/// One scoped thread per feed; results are joined back in registration order.
fn process_parallel<'a>(
    feeds: &'a [FeedDefinition],
    client: &Client,
    dir: &Path,
    now: DateTime<Utc>,
) -> Vec<FeedResult<'a>> {
    thread::scope(|scope| {
        let handles: Vec<_> = feeds
            .iter()
            .map(|feed| (feed, scope.spawn(move || process_feed(feed, client, dir, now))))
            .collect();

        handles
            .into_iter()
            .map(|(feed, handle)| {
                handle.join().unwrap_or_else(|payload| {
                    let reason = panic_message(payload.as_ref());
                    tracing::error!(feed = feed.id, error = %reason, "feed worker panicked");
                    FeedResult {
                        feed,
                        path: dir.join(feed.output_name),
                        item_count: 0,
                        status: FeedStatus::Failed(reason),
                    }
                })
            })
            .collect()
    })
}

fn process_feed<'a>(
    feed: &'a FeedDefinition,
    client: &Client,
    dir: &Path,
    now: DateTime<Utc>,
) -> FeedResult<'a> {
    let path = dir.join(feed.output_name);
    let ctx = FetchContext {
        client,
        channel_link: feed.link,
        now,
    };

    match fetch_and_write(feed, &ctx, &path) {
        Ok(item_count) => {
            tracing::info!(
                feed = feed.id,
                items = item_count,
                path = %path.display(),
                "feed written"
            );
            FeedResult {
                feed,
                path,
                item_count,
                status: FeedStatus::Written,
            }
        }
        Err(e) => {
            tracing::error!(
                feed = feed.id,
                error = %e,
                "feed skipped, previous output left in place"
            );
            FeedResult {
                feed,
                path,
                item_count: 0,
                status: FeedStatus::Failed(e.to_string()),
            }
        }
    }
}

fn fetch_and_write(
    feed: &FeedDefinition,
    ctx: &FetchContext<'_>,
    path: &Path,
) -> Result<usize, FeedError> {
    let items = panic::catch_unwind(AssertUnwindSafe(|| feed.source.fetch(ctx)))
        .map_err(|payload| FeedError::Panicked(panic_message(payload.as_ref())))??;

    let xml = render::rss::render(&feed.channel(), &items, Utc::now());
    write_atomic(path, xml.as_bytes()).map_err(|source| FeedError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(items.len())
}

/// Build the index row for `result`, probing the file on disk for its size.
fn index_entry(result: &FeedResult<'_>) -> IndexEntry {
    let size = fs::metadata(&result.path).map(|m| m.len()).ok();
    let title = result.feed.title.to_string();
    let href = Some(result.feed.output_name.to_string());

    match (&result.status, size) {
        (FeedStatus::Written, size) => IndexEntry {
            title,
            href,
            item_count: result.item_count,
            size: size.unwrap_or(0),
            status: EntryStatus::Fresh,
        },
        (FeedStatus::Failed(reason), Some(size)) => IndexEntry {
            title,
            href,
            item_count: 0,
            size,
            status: EntryStatus::Stale(reason.clone()),
        },
        (FeedStatus::Failed(reason), None) => IndexEntry {
            title,
            href: None,
            item_count: 0,
            size: 0,
            status: EntryStatus::Failed(reason.clone()),
        },
    }
}

/// Write `contents` to `path` via a temporary sibling and a rename.
///
/// On failure the temporary file is removed and `path` is untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name")
    })?;
    let mut temp_name = OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let result = write_then_rename(&temp_path, path, contents);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_then_rename(temp_path: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = File::create(temp_path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp_path, path)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::error::SourceError;
    use crate::http;
    use crate::source::{DataSource, NormalizedItem};

    /// Returns a fixed number of items.
    struct Fixed(usize);

    impl DataSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self, ctx: &FetchContext<'_>) -> Result<Vec<NormalizedItem>, SourceError> {
            Ok((0..self.0)
                .map(|i| NormalizedItem {
                    title: format!("Item {i}"),
                    link: format!("{}item/{i}", ctx.channel_link),
                    guid: format!("fixed-{i}"),
                    date: ctx.now,
                    description: String::new(),
                })
                .collect())
        }
    }

    /// Always fails as if the upstream returned 503.
    struct Unavailable;

    impl DataSource for Unavailable {
        fn name(&self) -> &str {
            "unavailable"
        }

        fn fetch(&self, _ctx: &FetchContext<'_>) -> Result<Vec<NormalizedItem>, SourceError> {
            Err(SourceError::Status {
                url: "https://upstream.invalid/hot".into(),
                status: 503,
            })
        }
    }

    struct Panics;

    impl DataSource for Panics {
        fn name(&self) -> &str {
            "panics"
        }

        fn fetch(&self, _ctx: &FetchContext<'_>) -> Result<Vec<NormalizedItem>, SourceError> {
            panic!("adapter bug")
        }
    }

    fn feed(
        id: &'static str,
        output_name: &'static str,
        source: Box<dyn DataSource>,
    ) -> FeedDefinition {
        FeedDefinition {
            id,
            output_name,
            title: id,
            link: "https://example.com/",
            description: "test feed",
            source,
        }
    }

    fn settings(dir: &Path) -> Settings {
        Settings {
            output_dir: dir.to_path_buf(),
            ..Settings::default()
        }
    }

    fn client() -> Client {
        http::client(&Settings::default()).unwrap()
    }

    #[test]
    fn writes_every_feed_and_index() {
        let tmp = TempDir::new().unwrap();
        let feeds = vec![
            feed("a", "a.xml", Box::new(Fixed(2))),
            feed("b", "b.xml", Box::new(Fixed(0))),
        ];

        let report = run(&feeds, &client(), &settings(tmp.path())).unwrap();

        assert!(report.results.iter().all(FeedResult::is_written));
        assert_eq!(report.results[0].item_count, 2);
        assert_eq!(report.results[1].item_count, 0);

        let a = fs::read_to_string(tmp.path().join("a.xml")).unwrap();
        assert_eq!(a.matches("<item>").count(), 2);
        assert!(tmp.path().join("b.xml").exists());
        assert_eq!(report.index_path, Some(tmp.path().join("index.html")));
    }

    #[test]
    fn failing_feed_does_not_block_others() {
        let tmp = TempDir::new().unwrap();
        let feeds = vec![
            feed("down", "down.xml", Box::new(Unavailable)),
            feed("up", "up.xml", Box::new(Fixed(3))),
        ];

        let report = run(&feeds, &client(), &settings(tmp.path())).unwrap();

        assert!(matches!(&report.results[0].status, FeedStatus::Failed(r) if r.contains("503")));
        assert!(!tmp.path().join("down.xml").exists());
        assert!(report.results[1].is_written());
        assert_eq!(report.results[1].item_count, 3);

        let index = fs::read_to_string(tmp.path().join("index.html")).unwrap();
        assert!(index.contains("<td>down</td>"));
        assert!(index.contains("failed: "));
        assert!(index.contains("<a href=\"up.xml\">up</a></td><td>3</td>"));
    }

    #[test]
    fn failed_feed_keeps_previous_output_and_is_marked_stale() {
        let tmp = TempDir::new().unwrap();
        let previous = "<rss>previous run</rss>";
        fs::write(tmp.path().join("down.xml"), previous).unwrap();

        let feeds = vec![feed("down", "down.xml", Box::new(Unavailable))];
        run(&feeds, &client(), &settings(tmp.path())).unwrap();

        assert_eq!(fs::read_to_string(tmp.path().join("down.xml")).unwrap(), previous);
        let index = fs::read_to_string(tmp.path().join("index.html")).unwrap();
        assert!(index.contains("<a href=\"down.xml\">down</a>"));
        assert!(index.contains(&format!("<td>{}</td>", previous.len())));
        assert!(index.contains("stale: "));
    }

    #[test]
    fn panicking_adapter_is_isolated() {
        let tmp = TempDir::new().unwrap();
        let feeds = vec![
            feed("bad", "bad.xml", Box::new(Panics)),
            feed("good", "good.xml", Box::new(Fixed(1))),
        ];

        let report = run(&feeds, &client(), &settings(tmp.path())).unwrap();

        assert!(matches!(
            &report.results[0].status,
            FeedStatus::Failed(r) if r.contains("adapter bug")
        ));
        assert!(report.results[1].is_written());
    }

    #[test]
    fn write_failure_is_isolated_to_its_feed() {
        let tmp = TempDir::new().unwrap();
        // A non-empty directory sitting on the output path cannot be replaced.
        let blocked = tmp.path().join("blocked.xml");
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep"), "previous").unwrap();

        let feeds = vec![
            feed("blocked", "blocked.xml", Box::new(Fixed(2))),
            feed("next", "next.xml", Box::new(Fixed(1))),
        ];

        let report = run(&feeds, &client(), &settings(tmp.path())).unwrap();

        assert!(matches!(
            &report.results[0].status,
            FeedStatus::Failed(r) if r.starts_with("cannot write")
        ));
        assert_eq!(report.results[0].item_count, 0);
        assert!(report.results[1].is_written());
        assert_eq!(report.results[1].item_count, 1);

        assert_eq!(fs::read_to_string(blocked.join("keep")).unwrap(), "previous");
        assert!(!tmp.path().join(".blocked.xml.tmp").exists());

        let index = fs::read_to_string(tmp.path().join("index.html")).unwrap();
        assert_eq!(index.matches("<tr><td>").count(), 2);
        assert!(index.contains(">blocked<"));
        assert!(index.contains("cannot write"));
        assert!(index.contains("<a href=\"next.xml\">next</a></td><td>1</td>"));
    }

    #[test]
    fn index_is_written_even_when_every_feed_fails() {
        let tmp = TempDir::new().unwrap();
        let feeds = vec![
            feed("x", "x.xml", Box::new(Unavailable)),
            feed("y", "y.xml", Box::new(Unavailable)),
        ];

        let report = run(&feeds, &client(), &settings(tmp.path())).unwrap();

        assert!(report.results.iter().all(|r| !r.is_written()));
        let index = fs::read_to_string(report.index_path.unwrap()).unwrap();
        assert_eq!(index.matches("<tr><td>").count(), 2);
    }

    #[test]
    fn parallel_run_keeps_registration_order() {
        let tmp = TempDir::new().unwrap();
        let feeds = vec![
            feed("first", "first.xml", Box::new(Fixed(1))),
            feed("second", "second.xml", Box::new(Unavailable)),
            feed("third", "third.xml", Box::new(Fixed(3))),
        ];
        let settings = Settings {
            parallel: true,
            ..settings(tmp.path())
        };

        let report = run(&feeds, &client(), &settings).unwrap();

        let ids: Vec<_> = report.results.iter().map(|r| r.feed.id).collect();
        assert_eq!(ids, ["first", "second", "third"]);
        assert_eq!(report.results[2].item_count, 3);

        let index = fs::read_to_string(tmp.path().join("index.html")).unwrap();
        let first = index.find("first.xml").unwrap();
        let second = index.find(">second<").unwrap();
        let third = index.find("third.xml").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn defaulted_dates_use_run_start() {
        let tmp = TempDir::new().unwrap();
        let feeds = vec![feed("a", "a.xml", Box::new(Fixed(1)))];
        let before = Utc::now();

        let report = run(&feeds, &client(), &settings(tmp.path())).unwrap();

        let doc = fs::read_to_string(tmp.path().join("a.xml")).unwrap();
        let channel = rss::Channel::read_from(doc.as_bytes()).unwrap();
        let published = DateTime::parse_from_rfc2822(channel.items()[0].pub_date().unwrap())
            .unwrap()
            .with_timezone(&Utc);
        // RFC 822 drops sub-second precision.
        assert!(published >= before - chrono::Duration::seconds(1));
        assert!(published <= report.generated_at);
    }

    #[test]
    fn unwritable_output_dir_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let feeds = vec![feed("a", "a.xml", Box::new(Fixed(1)))];
        let err = run(&feeds, &client(), &settings(&blocker.join("out"))).err().unwrap();

        assert!(matches!(err, RunError::OutputDir { .. }));
    }

    #[test]
    fn write_atomic_replaces_and_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("feed.xml");

        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"two");
        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, [OsString::from("feed.xml")]);
    }

    #[test]
    fn write_atomic_failure_cleans_up_temp_file() {
        let tmp = TempDir::new().unwrap();

        // Renaming a file over a non-empty directory fails.
        let target = tmp.path().join("busy");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("child"), "x").unwrap();

        assert!(write_atomic(&target, b"new").is_err());
        assert!(target.join("child").exists());
        assert!(!tmp.path().join(".busy.tmp").exists());
    }

    #[test]
    fn panic_message_extracts_payload() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    #[test]
    fn index_entry_for_written_feed_probes_size() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.xml");
        fs::write(&path, "12345").unwrap();
        let def = feed("a", "a.xml", Box::new(Fixed(0)));
        let result = FeedResult {
            feed: &def,
            path,
            item_count: 4,
            status: FeedStatus::Written,
        };

        let entry = index_entry(&result);
        assert_eq!(entry.size, 5);
        assert_eq!(entry.item_count, 4);
        assert_eq!(entry.status, EntryStatus::Fresh);
    }
}
