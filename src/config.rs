//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the beacon-config.toml file.
//! It provides defaults for the exclusion row, the gap search bounds and the number of
//! search workers, all of which can be overridden on the command line.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "beacon-config.toml";

/// Errors for configuration values that would make a search meaningless.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("search bounds are inverted: min_coord {min_coord} > max_coord {max_coord}")]
    InvertedBounds { min_coord: i64, max_coord: i64 },

    #[error("workers must be at least 1")]
    NoWorkers,
}

/// Application configuration loaded from beacon-config.toml
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Query parameters
    pub search: SearchConfig,
    /// Execution settings
    pub runtime: RuntimeConfig,
}

/// Rows and bounds to query
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Row used for the exclusion count
    pub row: i64,
    /// Lower bound (inclusive) of the gap search square, on both axes
    pub min_coord: i64,
    /// Upper bound (inclusive) of the gap search square, on both axes
    pub max_coord: i64,
}

/// Gap search execution settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuntimeConfig {
    /// Number of row bands searched concurrently; 1 runs the sequential search
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            search: SearchConfig {
                row: 2_000_000,
                min_coord: 0,
                max_coord: 4_000_000,
            },
            runtime: RuntimeConfig { workers: 1 },
        }
    }
}

impl Config {
    /// Load configuration from beacon-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format in {}: {}", path.display(), e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!(
                    "No config file found at {}, using default configuration",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Reject settings no search can run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.min_coord > self.search.max_coord {
            return Err(ConfigError::InvertedBounds {
                min_coord: self.search.min_coord,
                max_coord: self.search.max_coord,
            });
        }
        if self.runtime.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }
}
