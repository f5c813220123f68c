//! Application Configuration
//!
//! Layered from built-in defaults, an optional config file and
//! `FUEL_ESTIMATOR__*` environment variables (`__` separates sections,
//! e.g. `FUEL_ESTIMATOR__ARTIFACTS__MODEL_PATH`).

use crate::rate_limit::RateLimitConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use trip_estimator::{GeocoderConfig, TripFuelConvention};

/// Env var naming the config file (extension optional)
pub const CONFIG_PATH_ENV: &str = "FUEL_ESTIMATOR_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/fuel-estimator";
const ENV_PREFIX: &str = "FUEL_ESTIMATOR";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactConfig,
    pub geocoder: GeocoderSettings,
    pub trip: TripSettings,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Paths of the fitted model and scaler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// `.onnx` or `.json`
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/fuel_model.onnx"),
            scaler_path: PathBuf::from("models/scaler.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderSettings {
    /// When false only "lat, lon" locations are accepted
    pub enabled: bool,
    pub base_url: String,
    pub user_agent: String,
    pub timeout_ms: u64,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        let client = GeocoderConfig::default();
        Self {
            enabled: true,
            base_url: client.base_url,
            user_agent: client.user_agent,
            timeout_ms: client.timeout_ms,
        }
    }
}

impl GeocoderSettings {
    pub fn client_config(&self) -> GeocoderConfig {
        GeocoderConfig {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripSettings {
    pub fuel_convention: TripFuelConvention,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Load from the file named by `FUEL_ESTIMATOR_CONFIG` (or the default
    /// path, if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).ok();
        Self::load_from(path.as_deref())
    }

    /// Load with an explicit file. A missing default file is not an error;
    /// a missing explicit file is.
    pub fn load_from(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
