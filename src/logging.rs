//! Diagnostic tracing setup

use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Initialize the global tracing subscriber.
///
/// By default only this crate's events are emitted, at `TRACE` in debug
/// builds and `INFO` otherwise. The `BULKMAIL_LOG` environment variable
/// accepts a full filter directive (e.g. `bulkmail::engine=debug`) and
/// overrides the default entirely.
pub fn init() {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::TRACE
    } else {
        LevelFilter::INFO
    };

    let filter = EnvFilter::try_from_env("BULKMAIL_LOG").unwrap_or_else(|_| {
        EnvFilter::default().add_directive(
            format!("bulkmail={default_level}")
                .parse()
                .unwrap_or_else(|_| default_level.into()),
        )
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339())
                .with_filter(filter),
        )
        .init();
}
