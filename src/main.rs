//! Command-line entry point: one full run, then exit.
//!
//! Per-feed failures are logged and do not change the exit status; only a
//! run that cannot write anything at all exits non-zero.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hotfeeds::config::{self, Settings};
use hotfeeds::{feeds, http, run};

#[derive(Parser, Debug)]
#[command(name = "hotfeeds", version, about = "Render Zhihu and V2EX hot lists as RSS feeds")]
struct Args {
    /// Directory receiving the feed files and index.html
    #[arg(long, default_value = config::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Fetch all feeds concurrently instead of one after another
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    // Default to info-level diagnostics on stderr; RUST_LOG overrides.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = Settings {
        output_dir: args.output_dir,
        timeout: Duration::from_secs(args.timeout),
        parallel: args.parallel,
        ..Settings::default()
    };

    let client = http::client(&settings).context("failed to build HTTP client")?;
    let feeds = feeds::registry();

    let report = run::run(&feeds, &client, &settings).context("run aborted")?;
    for result in &report.results {
        match &result.status {
            run::FeedStatus::Written => println!(
                "{:<8} ok      {:>3} items  {}",
                result.feed.id,
                result.item_count,
                result.path.display()
            ),
            run::FeedStatus::Failed(reason) => {
                println!("{:<8} FAILED  {reason}", result.feed.id)
            }
        }
    }

    Ok(())
}
