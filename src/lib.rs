//! Bulk email dispatch engine
//!
//! This crate provides functionality to:
//! - Parse and validate large recipient lists
//! - Submit one dispatch job per recipient to a bounded worker pool
//! - Throttle submissions into fixed-size batches with an inter-batch delay
//! - Pause and resume a run mid-flight without dropping or duplicating jobs
//! - Isolate per-recipient delivery failures from the overall run

mod address;
mod batch;
mod config;
mod engine;
mod error;
pub mod logging;
mod mailer;
mod pause;
mod progress;
mod recipients;
pub mod sink;
mod smtp;
mod types;

pub use address::{InvalidAddress, Recipient};
pub use batch::Batcher;
pub use config::Config;
pub use engine::{DispatchEngine, RunSummary};
pub use error::{ConfigError, DispatchError};
pub use mailer::{Mailer, MailerError};
pub use pause::PauseGate;
pub use progress::{NoProgress, ProgressReporter};
pub use recipients::parse_lines;
pub use sink::{FileSink, LogSink, NullSink};
pub use smtp::SmtpMailer;
pub use types::{DeliveryStatus, DispatchJob, DispatchOutcome, MessageSpec};
