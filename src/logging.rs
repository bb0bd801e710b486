//! Tracing setup for the binary.

use crate::error::{DigestError, Result};
use std::path::Path;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "paper_digest=info";
const LOG_FILE_PREFIX: &str = "paper-digest.log";

/// Install the global subscriber.
///
/// Logs go to stderr, filtered by `RUST_LOG`. When `log_dir` is given they
/// are also appended to a daily-rolling file there; keep the returned guard
/// alive until exit or buffered lines are lost. A log directory that cannot
/// be opened is reported on stderr and file logging is skipped.
pub fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (appender, open_error) = match log_dir.map(file_appender) {
        Some(Ok(appender)) => (Some(appender), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    let (file_layer, guard) = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    if let Some(e) = open_error {
        warn!("File logging disabled: {}", e);
    }

    guard
}

/// Daily-rolling appender in `dir`, creating the directory if needed.
fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(dir)
        .map_err(|e| {
            DigestError::config(format!("cannot open log directory {}: {}", dir.display(), e))
        })
}
