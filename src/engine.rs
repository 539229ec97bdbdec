//! Bulk dispatch orchestration
//!
//! The engine owns one run end to end: it validates the candidate list,
//! announces the total, pushes one job per recipient through the pause gate
//! and the batcher into a bounded worker pool, and folds every outcome into
//! the run state through a single serialized aggregation path.
//!
//! Per-recipient failures are isolated: one recipient's failure never affects
//! another's delivery attempt, and it does not downgrade the overall run
//! result either; failures are recorded, not surfaced. Only configuration
//! errors and orchestration failures (an unreadable source file) surface as
//! an `Err`.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{
    sync::Semaphore,
    task::{JoinError, JoinSet},
};
use tracing::{debug, error, info, warn};

use crate::{
    address::Recipient,
    batch::Batcher,
    config::Config,
    error::DispatchError,
    mailer::Mailer,
    pause::PauseGate,
    progress::ProgressReporter,
    recipients,
    sink::LogSink,
    types::{DeliveryStatus, DispatchJob, DispatchOutcome, MessageSpec},
};

/// Final counters of a completed run.
///
/// `attempted` counts every dispatch that reached a terminal outcome,
/// success and failure alike; `failed` is the subset the transport rejected.
/// Skipped invalid candidates appear in neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub attempted: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Number of dispatches the transport accepted.
    #[must_use]
    pub const fn delivered(&self) -> usize {
        self.attempted - self.failed
    }
}

/// Counters mutated only on the aggregation path.
struct RunState {
    total: usize,
    sent: usize,
    failed: usize,
}

/// Orchestrates one bulk send over a bounded worker pool.
pub struct DispatchEngine {
    config: Config,
    mailer: Arc<dyn Mailer>,
    sink: Arc<dyn LogSink>,
    gate: PauseGate,
}

impl DispatchEngine {
    #[must_use]
    pub fn new(config: Config, mailer: Arc<dyn Mailer>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            config,
            mailer,
            sink,
            gate: PauseGate::new(),
        }
    }

    /// Suspend submission of new jobs. Jobs already executing run to
    /// completion. Idempotent, legal at any time.
    pub fn pause(&self) {
        info!("pausing submissions");
        self.gate.pause();
    }

    /// Resume a paused run from wherever the work queue left off. Calling
    /// this when not paused is a no-op.
    pub fn resume(&self) {
        info!("resuming submissions");
        self.gate.resume();
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.gate.is_paused()
    }

    /// Read the recipient and content files, then run a bulk send.
    ///
    /// Recipient lines are comma-separated address lists; the content file is
    /// joined with newline separators into the (pre-formatted) message body.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Source`] if either file cannot be read. A
    /// source failure aborts the run before any recipient is processed.
    pub async fn run_from_files(
        &self,
        recipient_file: &Path,
        content_file: &Path,
        cc: Vec<String>,
        subject: String,
        attachment: Option<PathBuf>,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<RunSummary, DispatchError> {
        let raw_recipients = read_source(recipient_file).await?;
        let content = read_source(content_file).await?;

        let candidates = recipients::parse_lines(raw_recipients.lines());
        let message = MessageSpec {
            subject,
            content: content.lines().collect::<Vec<_>>().join("\n"),
            cc,
            attachment,
        };

        Ok(self.run_bulk_send(candidates, message, reporter).await)
    }

    /// Dispatch `message` to every valid candidate, in list order.
    ///
    /// Candidates are validated once, up front: malformed entries are logged
    /// as warnings and excluded from the reported total. An empty list
    /// completes immediately with a total of zero.
    pub async fn run_bulk_send(
        &self,
        candidates: Vec<String>,
        message: MessageSpec,
        reporter: &mut dyn ProgressReporter,
    ) -> RunSummary {
        let valid = self.validate(candidates);
        let total = valid.len();

        reporter.on_start(total);
        info!(total, "starting bulk send");

        let mut state = RunState {
            total,
            sent: 0,
            failed: 0,
        };

        if total > 0 {
            self.dispatch_all(valid, Arc::new(message), &mut state, reporter)
                .await;
        }

        info!(
            total = state.total,
            attempted = state.sent,
            failed = state.failed,
            "bulk send complete"
        );

        RunSummary {
            total: state.total,
            attempted: state.sent,
            failed: state.failed,
        }
    }

    /// Validate candidates in order, keeping duplicates. Malformed entries
    /// are recorded and dropped; they count toward nothing.
    fn validate(&self, candidates: Vec<String>) -> Vec<Recipient> {
        let mut valid = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            match candidate.parse::<Recipient>() {
                Ok(recipient) => valid.push(recipient),
                Err(_) => {
                    warn!(address = %candidate, "skipping invalid recipient");
                    self.sink
                        .warning(&format!("Skipping invalid email: {candidate}"));
                }
            }
        }

        valid
    }

    /// Submission loop plus aggregation.
    ///
    /// The loop is single-threaded and sequential, so gating and batching
    /// happen in list order. Workers race to completion; outcomes are folded
    /// back here — and only here — which keeps counter updates and reporter
    /// calls serialized without any shared mutable state.
    async fn dispatch_all(
        &self,
        recipients: Vec<Recipient>,
        message: Arc<MessageSpec>,
        state: &mut RunState,
        reporter: &mut dyn ProgressReporter,
    ) {
        let pool = Arc::new(Semaphore::new(self.config.pool_size));
        let mut batcher = Batcher::new(self.config.batch_size, self.config.batch_delay());
        let mut workers: JoinSet<DispatchOutcome> = JoinSet::new();

        for recipient in recipients {
            // Gate strictly before the job is claimed, never mid-job
            self.gate.acquire().await;

            let job = DispatchJob {
                recipient,
                message: Arc::clone(&message),
            };
            let mailer = Arc::clone(&self.mailer);
            let pool = Arc::clone(&pool);

            workers.spawn(async move {
                // The permit bounds concurrent transport calls; submission
                // itself enqueues immediately. The pool is never closed.
                let _permit = pool.acquire_owned().await.ok();

                match mailer.send(&job).await {
                    Ok(()) => DispatchOutcome::sent(job.recipient),
                    Err(err) => DispatchOutcome::failed(job.recipient, &err),
                }
            });

            // Drain finished workers opportunistically so progress flows
            // while submission is still underway
            while let Some(joined) = workers.try_join_next() {
                self.settle(joined, state, reporter);
            }

            batcher.pace().await;
        }

        // Barrier: every submitted job must reach a terminal outcome
        while let Some(joined) = workers.join_next().await {
            self.settle(joined, state, reporter);
        }
    }

    /// Fold one terminal outcome into the run state.
    fn settle(
        &self,
        joined: Result<DispatchOutcome, JoinError>,
        state: &mut RunState,
        reporter: &mut dyn ProgressReporter,
    ) {
        state.sent += 1;

        match joined {
            Ok(outcome) => match outcome.status {
                DeliveryStatus::Sent => {
                    debug!(recipient = %outcome.recipient, "delivered");
                }
                DeliveryStatus::Failed => {
                    state.failed += 1;
                    let detail = outcome.error.as_deref().unwrap_or("unknown error");
                    error!(recipient = %outcome.recipient, error = detail, "delivery failed");
                    self.sink
                        .error(&format!("Failed to send to {}: {detail}", outcome.recipient));
                }
            },
            Err(join_error) => {
                // A panicked worker is isolated like any other failed attempt
                state.failed += 1;
                error!(error = %join_error, "dispatch worker failed");
                self.sink
                    .error(&format!("Dispatch worker failed: {join_error}"));
            }
        }

        reporter.on_progress(state.sent, state.total);
    }
}

async fn read_source(path: &Path) -> Result<String, DispatchError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DispatchError::Source {
            path: path.to_path_buf(),
            source,
        })
}
