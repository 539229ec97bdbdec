//! Delivery transport boundary

use std::{io, path::PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::types::DispatchJob;

/// Errors a transport can report for a single dispatch attempt.
///
/// These are always local to one recipient: the engine records them and
/// moves on, they never abort the run and are never retried.
#[derive(Debug, Error)]
pub enum MailerError {
    /// An address could not be understood by the transport.
    #[error("invalid mail address: {0}")]
    Address(String),

    /// The message itself could not be constructed.
    #[error("could not build message: {0}")]
    Message(String),

    /// The attachment file could not be read.
    #[error("could not read attachment {}: {source}", path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The transport rejected or failed the delivery.
    #[error("delivery failed: {0}")]
    Transport(String),
}

/// The capability that actually delivers a message.
///
/// Implementations must be safe to invoke concurrently from multiple workers
/// with independent arguments; a failed send is reported as an error value
/// and must not corrupt shared state.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver the job's message to its recipient, attaching the run's file
    /// when one is configured.
    async fn send(&self, job: &DispatchJob) -> Result<(), MailerError>;
}
