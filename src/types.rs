//! Job and outcome types for the dispatch engine

use std::{path::PathBuf, sync::Arc};

use crate::{address::Recipient, mailer::MailerError};

/// The message shared by every job of a run.
///
/// Built once per run and shared read-only across workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSpec {
    /// Subject line.
    pub subject: String,
    /// Pre-formatted HTML body.
    pub content: String,
    /// Carbon-copy addresses, passed through to the transport unvalidated.
    pub cc: Vec<String>,
    /// Optional file to attach to every message.
    pub attachment: Option<PathBuf>,
}

/// One fully-specified unit of work: a single recipient's send attempt.
///
/// Immutable once built; consumed by exactly one worker.
#[derive(Debug, Clone)]
pub struct DispatchJob {
    pub recipient: Recipient,
    pub message: Arc<MessageSpec>,
}

/// Terminal state of a dispatch job. No further transitions occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

/// Result of one dispatch attempt, returned by value from the worker that
/// executed it to the aggregator that owns it.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub recipient: Recipient,
    pub status: DeliveryStatus,
    /// Error detail, present only for failed attempts.
    pub error: Option<String>,
}

impl DispatchOutcome {
    #[must_use]
    pub const fn sent(recipient: Recipient) -> Self {
        Self {
            recipient,
            status: DeliveryStatus::Sent,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(recipient: Recipient, error: &MailerError) -> Self {
        Self {
            recipient,
            status: DeliveryStatus::Failed,
            error: Some(error.to_string()),
        }
    }
}
