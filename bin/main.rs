use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use bulkmail::{Config, DispatchEngine, ProgressReporter, SmtpMailer, logging, sink};

/// Dispatch a templated message to every recipient in a file, in rate-limited
/// batches.
#[derive(Debug, Parser)]
#[command(name = "bulkmail", version, about)]
struct Args {
    /// Recipient file: one comma-separated address list per line.
    recipients: PathBuf,

    /// Content file: pre-formatted HTML, joined into the message body.
    content: PathBuf,

    /// Subject line for every message.
    #[arg(short, long)]
    subject: String,

    /// Carbon-copy address, repeatable.
    #[arg(long)]
    cc: Vec<String>,

    /// File to attach to every message.
    #[arg(long)]
    attachment: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(short, long, default_value = "bulkmail.toml")]
    config: PathBuf,

    /// Run log destination for skipped recipients and failed deliveries.
    #[arg(long, default_value = "error.log")]
    log_file: PathBuf,
}

/// Reporter that surfaces run progress through tracing.
#[derive(Debug, Default)]
struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn on_start(&mut self, total: usize) {
        info!(total, "dispatching");
    }

    fn on_progress(&mut self, sent: usize, total: usize) {
        info!(sent, total, "progress");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();

    let raw = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading configuration from {}", args.config.display()))?;
    let config: Config = toml::from_str(&raw)
        .with_context(|| format!("parsing configuration from {}", args.config.display()))?;
    config.validate()?;

    let sink = sink::for_run(config.log_enabled, &args.log_file);
    let mailer = Arc::new(SmtpMailer::from_config(&config)?);
    let engine = DispatchEngine::new(config, mailer, sink);

    let mut reporter = ConsoleProgress;
    let summary = engine
        .run_from_files(
            &args.recipients,
            &args.content,
            args.cc,
            args.subject,
            args.attachment,
            &mut reporter,
        )
        .await?;

    info!(
        total = summary.total,
        delivered = summary.delivered(),
        failed = summary.failed,
        "run finished"
    );

    Ok(())
}
