//! Shared test doubles for engine tests

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use bulkmail::{Config, DispatchJob, LogSink, Mailer, MailerError, MessageSpec, ProgressReporter};

/// Configuration pointing at nothing in particular; the engine never opens a
/// network connection in these tests.
#[must_use]
pub fn test_config(batch_size: u32, batch_delay_ms: u64, pool_size: usize) -> Config {
    Config {
        from: "sender@example.com".to_owned(),
        alias: None,
        smtp_host: "localhost".to_owned(),
        smtp_port: 587,
        username: "sender".to_owned(),
        password: "hunter2".to_owned(),
        batch_delay_ms,
        batch_size,
        pool_size,
        log_enabled: true,
    }
}

/// Mailer that records every job it sees and fails the configured recipients.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    calls: Mutex<Vec<String>>,
    messages: Mutex<Vec<MessageSpec>>,
    fail_for: HashSet<String>,
}

impl RecordingMailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing_for<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            fail_for: addresses.into_iter().map(Into::into).collect(),
        }
    }

    /// Recipients seen so far, in completion order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("mailer mutex poisoned").clone()
    }

    /// Message specs seen so far, in completion order.
    #[must_use]
    pub fn messages(&self) -> Vec<MessageSpec> {
        self.messages.lock().expect("mailer mutex poisoned").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, job: &DispatchJob) -> Result<(), MailerError> {
        let recipient = job.recipient.as_str().to_owned();
        self.calls
            .lock()
            .expect("mailer mutex poisoned")
            .push(recipient.clone());
        self.messages
            .lock()
            .expect("mailer mutex poisoned")
            .push((*job.message).clone());

        if self.fail_for.contains(&recipient) {
            Err(MailerError::Transport("simulated rejection".to_owned()))
        } else {
            Ok(())
        }
    }
}

/// One observed reporter notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Start(usize),
    Progress(usize, usize),
}

/// Reporter that appends every notification to a shared list, so a run moved
/// into a spawned task can still be inspected from the test body.
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    events: Arc<Mutex<Vec<Event>>>,
}

impl CollectingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A second handle onto the same event list.
    #[must_use]
    pub fn handle(&self) -> Self {
        self.clone()
    }

    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("reporter mutex poisoned").clone()
    }

    #[must_use]
    pub fn progress_events(&self) -> Vec<(usize, usize)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Progress(sent, total) => Some((sent, total)),
                Event::Start(_) => None,
            })
            .collect()
    }
}

impl ProgressReporter for CollectingReporter {
    fn on_start(&mut self, total: usize) {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .push(Event::Start(total));
    }

    fn on_progress(&mut self, sent: usize, total: usize) {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .push(Event::Progress(sent, total));
    }
}

/// In-memory log sink capturing warnings and errors separately.
#[derive(Debug, Default)]
pub struct MemorySink {
    warnings: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().expect("sink mutex poisoned").clone()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("sink mutex poisoned").clone()
    }
}

impl LogSink for MemorySink {
    fn warning(&self, message: &str) {
        self.warnings
            .lock()
            .expect("sink mutex poisoned")
            .push(message.to_owned());
    }

    fn error(&self, message: &str) {
        self.errors
            .lock()
            .expect("sink mutex poisoned")
            .push(message.to_owned());
    }
}
