//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use std::path::Path;

use super::models::*;
use super::Result;

/// Builder for creating `FamilyTreeConfig` instances.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: FamilyTreeConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the in-memory storage backend.
    pub fn with_memory_storage(mut self) -> Self {
        self.config.storage.backend = StorageBackend::Memory;
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log output format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Log to a file instead of stdout.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self.config.logging.stdout = false;
        self
    }

    /// Enable or disable logging to stdout.
    pub fn with_stdout(mut self, stdout: bool) -> Self {
        self.config.logging.stdout = stdout;
        self
    }

    /// Validate and build the final configuration.
    pub fn build(self) -> Result<FamilyTreeConfig> {
        self.config
            .validate()
            .map_err(super::ConfigError::ValidationError)?;
        Ok(self.config)
    }
}
