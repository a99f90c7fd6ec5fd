//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] on top of a single JSON document.  Missing
//! fields take their defaults; a missing file yields the default
//! configuration.  Values are validated on both load and save.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::StarterConfig;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<StarterConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("JsonConfig: {} not found, using defaults", self.path.display());
                return Ok(StarterConfig::default());
            }
            Err(e) => {
                warn!("JsonConfig: reading {} failed: {}", self.path.display(), e);
                return Err(ConfigError::IoError);
            }
        };

        let config: StarterConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("JsonConfig: {} is not valid config: {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        config.validate()?;
        info!("JsonConfig: loaded {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &StarterConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config).map_err(|_| ConfigError::Corrupted)?;
        fs::write(&self.path, text).map_err(|e| {
            warn!("JsonConfig: writing {} failed: {}", self.path.display(), e);
            ConfigError::IoError
        })?;
        info!("JsonConfig: saved {}", self.path.display());
        Ok(())
    }
}
