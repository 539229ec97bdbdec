//! Submission-side batching
//!
//! Throttles the rate of outbound work independent of how fast individual
//! jobs complete: the counter is tied to *submission* count, not completion
//! count, so the outbound rate stays bounded regardless of pool concurrency.

use std::time::Duration;

use tracing::debug;

/// Groups consecutive submissions into fixed-size batches separated by a
/// configured delay.
///
/// After every `batch_size` submissions the submission path sleeps for
/// `delay` before accepting the next one. A batch size of zero or a zero
/// delay disables batching entirely.
#[derive(Debug)]
pub struct Batcher {
    batch_size: u32,
    delay: Duration,
    submitted: u32,
}

impl Batcher {
    #[must_use]
    pub const fn new(batch_size: u32, delay: Duration) -> Self {
        Self {
            batch_size,
            delay,
            submitted: 0,
        }
    }

    /// Record one submission and, on a batch boundary, sleep for the
    /// configured inter-batch delay.
    pub async fn pace(&mut self) {
        if self.batch_size == 0 || self.delay.is_zero() {
            return;
        }

        self.submitted += 1;
        if self.submitted == self.batch_size {
            self.submitted = 0;
            debug!(
                batch_size = self.batch_size,
                delay = ?self.delay,
                "batch boundary reached, throttling submissions"
            );
            tokio::time::sleep(self.delay).await;
        }
    }
}
