use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tuner_detection::Tolerance;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Config {
    pub system: SystemConfig,
    pub calibration: CalibrationConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SystemConfig {
    pub log_level: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CalibrationConfig {
    pub tolerance: [i64; 3],
    pub mask_extension: String,
}

impl CalibrationConfig {
    // Out-of-domain values are clamped here rather than failing the parse.
    pub fn tolerance(&self) -> Tolerance {
        let [h, s, v] = self.tolerance;
        Tolerance::new(h, s, v)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    // Load config from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    // Load default config
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_file(DEFAULT_CONFIG_PATH)
    }

    // Explicit path if given, otherwise the default location
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::load_default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            system: SystemConfig {
                log_level: "info".to_string(),
            },
            calibration: CalibrationConfig {
                tolerance: [50, 40, 30],
                mask_extension: "png".to_string(),
            },
        }
    }
}
