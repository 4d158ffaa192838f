//! crates/logging/src/subscriber.rs
//! Process-wide subscriber installation.

use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LOG_ENV, LogConfig};

/// Failure to install the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LogInitError {
    /// `ZSSH_LOG` holds directives the filter parser rejects.
    #[error("invalid {LOG_ENV} directives: {0}")]
    InvalidDirectives(String),
    /// Another subscriber was installed first.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

/// Builds the filter from `ZSSH_LOG` or the configuration's defaults.
pub(crate) fn build_filter(config: &LogConfig, env: Option<&str>) -> Result<EnvFilter, LogInitError> {
    match env.map(str::trim).filter(|value| !value.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|error| LogInitError::InvalidDirectives(error.to_string())),
        None => EnvFilter::try_new(config.default_directives())
            .map_err(|error| LogInitError::InvalidDirectives(error.to_string())),
    }
}

/// Installs the global subscriber.
///
/// Events go to stderr without timestamps. Level names are padded so that
/// multi-line sessions line up.
pub fn init(config: &LogConfig) -> Result<(), LogInitError> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(config, env.as_deref())?;

    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.ansi())
        .with_target(config.debug())
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|_| LogInitError::AlreadyInstalled)
}
