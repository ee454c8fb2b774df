//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] by reading a `SystemConfig` from a JSON
//! file.  Missing fields take their defaults; a missing file yields
//! [`SystemConfig::default()`].  The result is always validated.

use std::io::ErrorKind;
use std::path::PathBuf;

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

pub struct JsonFileConfig {
    path: Option<PathBuf>,
}

impl JsonFileConfig {
    /// `None` means "no file": defaults only.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Parse and validate a JSON document.
    pub fn parse(text: &str) -> Result<SystemConfig, ConfigError> {
        let cfg: SystemConfig = serde_json::from_str(text).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

impl ConfigPort for JsonFileConfig {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let Some(path) = &self.path else {
            info!("JsonFileConfig: no config file, using defaults");
            return Ok(SystemConfig::default());
        };
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let cfg = Self::parse(&text)?;
                info!("JsonFileConfig: loaded {}", path.display());
                Ok(cfg)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("JsonFileConfig: {} not found, using defaults", path.display());
                Ok(SystemConfig::default())
            }
            Err(_) => Err(ConfigError::IoError),
        }
    }
}
