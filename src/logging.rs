//! Tracing subscriber setup.
//!
//! The interactive dashboard owns the terminal, so it must never log to
//! stdout/stderr: its events go to the configured log file or nowhere.

use crate::config::LoggingConfig;
use crate::error::{ConfigError, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Where log events end up when no log file is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Headless runs
    Stderr,
    /// The TUI is drawing on the terminal
    Discard,
}

/// Build the filter: `RUST_LOG` wins over the configured level
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| {
        ConfigError::InvalidValue {
            field: "logging.level".to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig, target: LogTarget) -> Result<()> {
    let filter = build_filter(&config.level)?;

    let (writer, ansi) = match (&config.file, target) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        (None, LogTarget::Stderr) => (BoxMakeWriter::new(std::io::stderr), atty::is(atty::Stream::Stderr)),
        (None, LogTarget::Discard) => (BoxMakeWriter::new(std::io::sink), false),
    };

    let (plain_layer, json_layer) = if config.json {
        (None, Some(fmt::layer().json().with_writer(writer)))
    } else {
        (Some(fmt::layer().with_ansi(ansi).with_writer(writer)), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain_layer)
        .with(json_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;
    Ok(())
}
