use crate::constants::{DEFAULT_POINT_COUNT, DEFAULT_SEED, SIMULATED_DATASET};
use crate::error::{MobilityError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Dataset served by the unnamed compatibility routes.
    #[serde(default = "default_dataset")]
    pub default_dataset: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_points")]
    pub points: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_port() -> u16 {
    3000
}

fn default_dataset() -> String {
    SIMULATED_DATASET.to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_points() -> usize {
    DEFAULT_POINT_COUNT
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: default_port(),
            default_dataset: default_dataset(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            dir: default_data_dir(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            points: default_points(),
            seed: default_seed(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            data: DataConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `config.toml` if present, otherwise falls
    /// back to built-in defaults.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "config file '{}' not found, using defaults",
                path.display()
            );
            return Ok(Config::default());
        }
        let config_content = fs::read_to_string(path).map_err(|e| {
            MobilityError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}
