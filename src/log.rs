// src/log.rs
//
// Tracing setup for both binaries. Console output is always on; a daily
// rolling file is added when a log directory is given.
//
// Filter comes from `RUST_LOG`, default `info`, e.g.
//   RUST_LOG=futbol_scrape=debug,reqwest=warn

use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "futbol_scrape.log";

#[derive(Clone, Debug, Default)]
pub struct LogConfig {
    /// Write `futbol_scrape.log.<date>` here as well as to the console.
    pub dir: Option<PathBuf>,
    /// Filter used when `RUST_LOG` is unset or invalid.
    pub default_filter: Option<String>,
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber. Keep the returned guard alive until exit,
/// or buffered file lines are lost.
pub fn init(cfg: &LogConfig) -> io::Result<Option<WorkerGuard>> {
    let default = cfg.default_filter.as_deref().unwrap_or("info");

    let console = fmt::layer()
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .with_filter(env_filter(default));

    let (file, guard) = match &cfg.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_filter(env_filter(default));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(console).with(file).try_init();
    Ok(guard)
}
