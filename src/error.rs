//! Error types.
//!
//! Errors are layered by how far they may travel:
//!
//! * [`SourceError`]: one upstream could not be read.  Stops at the
//!   orchestrator's per-feed boundary.
//! * [`FeedError`]: anything that kept one feed from being written.  Logged
//!   and recorded in the index, never propagated.
//! * [`RunError`]: nothing can be written at all.  Aborts the run.
//!
//! Shape problems inside a valid JSON payload are not errors; they resolve to
//! fallback values in [`crate::source::extract`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a JSON payload from an upstream.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network-level error (DNS, connection, TLS, timeout, body read).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// HTTP response with a non-2xx status code.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    /// Response body is not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a single feed produced no output this run.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    /// The adapter panicked; the payload message is kept for the log.
    #[error("source panicked: {0}")]
    Panicked(String),
}

/// Fatal, run-aborting failure.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("cannot create output directory {}: {source}", .path.display())]
    OutputDir { path: PathBuf, source: io::Error },
}
