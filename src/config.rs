//! Run configuration
//!
//! One immutable [`Config`] is constructed per run and threaded through every
//! component that needs it; there is no ambient global lookup. It can be
//! deserialized from TOML or built from a flat key/value mapping in the
//! `config.properties` style.

use std::{collections::HashMap, time::Duration};

use serde::Deserialize;

use crate::error::ConfigError;

const fn default_smtp_port() -> u16 {
    587
}

const fn default_batch_delay_ms() -> u64 {
    900_000 // 15 minutes between batches
}

const fn default_batch_size() -> u32 {
    50
}

const fn default_pool_size() -> usize {
    10
}

const fn default_log_enabled() -> bool {
    true
}

/// Immutable configuration for one bulk send run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Envelope sender address.
    pub from: String,

    /// Display alias for the sender.
    #[serde(default)]
    pub alias: Option<String>,

    /// SMTP relay hostname.
    pub smtp_host: String,

    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Transport credentials.
    pub username: String,
    pub password: String,

    /// Delay between submission batches, in milliseconds. Zero disables
    /// batching.
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    /// Number of submissions per batch. Zero disables batching.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Number of concurrent dispatch workers.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Whether skipped recipients and failed deliveries are recorded to the
    /// log sink.
    #[serde(default = "default_log_enabled")]
    pub log_enabled: bool,
}

impl Config {
    /// Build a configuration from a flat key→value mapping.
    ///
    /// Recognized keys follow the flat properties layout: `mail.from`,
    /// `mail.alias`, `mail.smtp.host`, `mail.smtp.port`, `mail.username`,
    /// `mail.password`, `mail.wait.time`, `mail.send.batch.size`,
    /// `mail.send.thread.pool.size`, and `log.enabled`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required key is missing or a value
    /// cannot be parsed.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            map.get(key)
                .filter(|value| !value.trim().is_empty())
                .cloned()
                .ok_or(ConfigError::MissingKey(key))
        };

        let config = Self {
            from: required("mail.from")?,
            alias: map.get("mail.alias").cloned(),
            smtp_host: required("mail.smtp.host")?,
            smtp_port: parse_or(map, "mail.smtp.port", default_smtp_port())?,
            username: required("mail.username")?,
            password: required("mail.password")?,
            batch_delay_ms: parse_or(map, "mail.wait.time", default_batch_delay_ms())?,
            batch_size: parse_or(map, "mail.send.batch.size", default_batch_size())?,
            pool_size: parse_or(map, "mail.send.thread.pool.size", default_pool_size())?,
            log_enabled: parse_or(map, "log.enabled", default_log_enabled())?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde deserialization cannot express.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required setting is empty or the pool
    /// size is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.from.trim().is_empty() {
            return Err(ConfigError::MissingKey("mail.from"));
        }
        if self.smtp_host.trim().is_empty() {
            return Err(ConfigError::MissingKey("mail.smtp.host"));
        }
        if self.username.trim().is_empty() {
            return Err(ConfigError::MissingKey("mail.username"));
        }
        if self.password.trim().is_empty() {
            return Err(ConfigError::MissingKey("mail.password"));
        }
        if self.pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "mail.send.thread.pool.size",
                value: "0".to_owned(),
            });
        }

        Ok(())
    }

    /// The inter-batch delay as a [`Duration`].
    #[must_use]
    pub const fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

fn parse_or<T: std::str::FromStr>(
    map: &HashMap<String, String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    map.get(key).map_or(Ok(default), |value| {
        value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.clone(),
        })
    })
}
