//! Suspend/resume coordination for a single run
//!
//! The gate carries no job-level memory: a paused-then-resumed run continues
//! from wherever the submission loop left off. Gating happens strictly before
//! a job is claimed, never mid-job, so no job is dropped or duplicated.

use tokio::sync::watch;

/// Pause/resume gate shared between the submission loop and its controller.
///
/// `pause` takes effect immediately and returns without blocking; workers
/// already executing a job run to completion. `resume` wakes every waiter,
/// which then re-checks the flag to defend against a resume racing with a
/// subsequent pause. Both operations are idempotent.
#[derive(Debug)]
pub struct PauseGate {
    paused: watch::Sender<bool>,
}

impl PauseGate {
    #[must_use]
    pub fn new() -> Self {
        let (paused, _) = watch::channel(false);
        Self { paused }
    }

    /// Set the pause flag. Does not block.
    pub fn pause(&self) {
        self.paused.send_replace(true);
    }

    /// Clear the pause flag and wake every blocked waiter. Calling this when
    /// the gate is not paused is a no-op.
    pub fn resume(&self) {
        self.paused.send_replace(false);
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        *self.paused.borrow()
    }

    /// Wait until the gate is open.
    ///
    /// Returns immediately if the gate is not paused; otherwise parks the
    /// caller (no spinning) until `resume` is called and the flag is observed
    /// clear.
    pub async fn acquire(&self) {
        let mut flag = self.paused.subscribe();
        // The sender lives in self, so the channel cannot close while we wait
        let _ = flag.wait_for(|paused| !*paused).await;
    }
}

impl Default for PauseGate {
    fn default() -> Self {
        Self::new()
    }
}
