//! Run log sink
//!
//! Skipped recipients and failed deliveries are recorded through this
//! boundary as append-only, timestamped entries. A sink that cannot write
//! must never fail the run: write errors are swallowed, not propagated.

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use tracing::debug;

/// Append-only record of a run's warnings and errors.
pub trait LogSink: Send + Sync {
    /// Record a recoverable anomaly, e.g. a skipped recipient.
    fn warning(&self, message: &str);

    /// Record a failed delivery or worker fault.
    fn error(&self, message: &str);
}

/// Sink that drops every entry, used when logging is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// File-backed sink writing one timestamped line per entry.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn append(&self, level: &str, message: &str) {
        let line = format!("[{}] {level}: {message}\n", Utc::now().to_rfc3339());

        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(err) = written {
            // A sink failure must never fail the run
            debug!(path = %self.path.display(), error = %err, "log sink write failed");
        }
    }
}

impl LogSink for FileSink {
    fn warning(&self, message: &str) {
        self.append("WARNING", message);
    }

    fn error(&self, message: &str) {
        self.append("ERROR", message);
    }
}

/// Pick the sink the configuration asks for: a [`FileSink`] at `path` when
/// logging is enabled, otherwise a [`NullSink`].
#[must_use]
pub fn for_run(log_enabled: bool, path: &Path) -> Arc<dyn LogSink> {
    if log_enabled {
        Arc::new(FileSink::new(path))
    } else {
        Arc::new(NullSink)
    }
}
