//! Progress reporting boundary
//!
//! The presentation layer subscribes here; the engine only guarantees the
//! calling discipline.

/// Callback surface notified as a run advances.
///
/// `on_start` is invoked exactly once per run, before any `on_progress`
/// call. `on_progress` is invoked once per terminal job outcome — success
/// and failure alike — with `sent` increasing by exactly one each call and
/// never exceeding `total`.
///
/// The engine serializes calls (they are never concurrent with each other)
/// but makes no promise about which thread they arrive on.
pub trait ProgressReporter: Send {
    fn on_start(&mut self, total: usize);
    fn on_progress(&mut self, sent: usize, total: usize);
}

/// Reporter that discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn on_start(&mut self, _total: usize) {}
    fn on_progress(&mut self, _sent: usize, _total: usize) {}
}
