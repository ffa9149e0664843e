//! Structured logging infrastructure for kintree.
//!
//! A configurable logging system based on the tracing crate, supporting
//! different output formats and log levels. `RUST_LOG` takes precedence over
//! the configured level when set.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Error type for logging operations
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error in subscriber setup
    #[error("Subscriber error: {0}")]
    Subscriber(String),
}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Initialize the logging system with the given configuration.
///
/// Safe to call more than once; an already-installed global subscriber is
/// not an error.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let result = match config.format {
        LogFormat::Json => init_json_logging(config),
        LogFormat::Compact => init_compact_logging(config),
        LogFormat::Pretty => init_pretty_logging(config),
        LogFormat::Default => init_default_logging(config),
    };

    // If the error is "already set", ignore it
    if let Err(LogError::Subscriber(ref msg)) = result
        && msg.contains("global default")
    {
        return Ok(());
    }

    result
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()))
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn init_json_logging(config: &LoggingConfig) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(config))
        .with_target(true)
        .with_line_number(true);

    if let Some(file_path) = &config.file {
        let file = open_log_file(file_path)?;
        subscriber
            .with_writer(Arc::new(file))
            .try_init()
            .map_err(|e| LogError::Subscriber(e.to_string()))?;
    } else if config.stdout {
        subscriber
            .try_init()
            .map_err(|e| LogError::Subscriber(e.to_string()))?;
    }
    Ok(())
}

fn init_compact_logging(config: &LoggingConfig) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter(config))
        .with_target(true);

    if let Some(file_path) = &config.file {
        let file = open_log_file(file_path)?;
        subscriber
            .with_writer(Arc::new(file))
            .try_init()
            .map_err(|e| LogError::Subscriber(e.to_string()))?;
    } else if config.stdout {
        subscriber
            .try_init()
            .map_err(|e| LogError::Subscriber(e.to_string()))?;
    }
    Ok(())
}

fn init_pretty_logging(config: &LoggingConfig) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(env_filter(config));

    if let Some(file_path) = &config.file {
        let file = open_log_file(file_path)?;
        subscriber
            .with_writer(Arc::new(file))
            .try_init()
            .map_err(|e| LogError::Subscriber(e.to_string()))?;
    } else if config.stdout {
        subscriber
            .try_init()
            .map_err(|e| LogError::Subscriber(e.to_string()))?;
    }
    Ok(())
}

fn init_default_logging(config: &LoggingConfig) -> Result<()> {
    let subscriber = tracing_subscriber::fmt().with_env_filter(env_filter(config));

    if let Some(file_path) = &config.file {
        let file = open_log_file(file_path)?;
        subscriber
            .with_writer(Arc::new(file))
            .try_init()
            .map_err(|e| LogError::Subscriber(e.to_string()))?;
    } else if config.stdout {
        subscriber
            .try_init()
            .map_err(|e| LogError::Subscriber(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;

    #[test]
    fn repeated_init_is_not_an_error() {
        let config = LoggingConfig::default();
        assert!(init(&config).is_ok());
        assert!(init(&config).is_ok());
    }

    #[test]
    fn silent_config_initializes_nothing() {
        let config = LoggingConfig {
            stdout: false,
            file: None,
            ..Default::default()
        };
        assert!(init(&config).is_ok());
    }
}
