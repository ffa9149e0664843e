//! Configuration loader.
//!
//! Loads configuration from multiple sources: built-in defaults, then an
//! optional TOML file, then `KINTREE_`-prefixed environment variables, with
//! later sources overriding earlier ones.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use super::models::FamilyTreeConfig;
use super::{ConfigError, Result, DEFAULT_CONFIG_FILES, ENV_PREFIX};

/// Configuration loader that handles loading from multiple sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    figment: Figment,
}

impl ConfigLoader {
    /// Create a new configuration loader seeded with default values.
    pub fn new() -> Self {
        let figment = Figment::new().merge(Serialized::defaults(FamilyTreeConfig::default()));
        Self { figment }
    }

    /// Load configuration from a TOML file.
    pub fn load_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileLoadError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        self.figment = self.figment.merge(Toml::file(path));
        Ok(self)
    }

    /// Attempt to load from the default configuration file locations.
    pub fn load_default_files(mut self) -> Self {
        for file in DEFAULT_CONFIG_FILES {
            let path = PathBuf::from(file);
            if path.exists() {
                self.figment = self.figment.merge(Toml::file(path));
                break;
            }
        }
        self
    }

    /// Merge `KINTREE_`-prefixed environment variables.
    ///
    /// Nested keys use double underscores, e.g. `KINTREE_LOGGING__LEVEL=debug`.
    pub fn load_env(mut self) -> Self {
        self.figment = self.figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        self
    }

    /// Extract and validate the final configuration.
    pub fn build(self) -> Result<FamilyTreeConfig> {
        let config: FamilyTreeConfig = self
            .figment
            .extract()
            .map_err(|e| ConfigError::Other(e.to_string()))?;
        config.validate().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
