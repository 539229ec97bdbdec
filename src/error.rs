//! Error types for the bulk dispatcher
//!
//! Only two classes of error abort a run: configuration errors, which are
//! surfaced before any recipient is processed, and orchestration failures
//! such as an unreadable recipient or content source. Everything else (a
//! malformed address, a rejected delivery) is absorbed, logged, and the run
//! continues.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Fatal configuration problems. These abort the run before any send.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is absent.
    #[error("missing required setting: {0}")]
    MissingKey(&'static str),

    /// A setting is present but cannot be parsed.
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Fatal, run-level failures.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Required settings absent or unparsable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The recipient or content source could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
