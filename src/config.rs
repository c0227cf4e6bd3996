//! Run settings.
//!
//! The feed registry itself is static (see [`crate::feeds`]); only where the
//! output goes and how requests behave are tunable, via command-line flags in
//! `main.rs` layered over [`Settings::default`].

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OUTPUT_DIR: &str = "public";
pub const INDEX_FILE: &str = "index.html";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const USER_AGENT: &str = concat!("hotfeeds/", env!("CARGO_PKG_VERSION"), " (RSS generator)");

#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory receiving every feed file and the index.
    pub output_dir: PathBuf,
    /// File name of the HTML index inside `output_dir`.
    pub index_name: String,
    /// Upper bound for each upstream request, connect through body.
    pub timeout: Duration,
    pub user_agent: String,
    /// Fetch feeds on scoped threads instead of one after another.
    pub parallel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            index_name: INDEX_FILE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
            parallel: false,
        }
    }
}

impl Settings {
    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join(&self.index_name)
    }
}
