//! # Configuration
//!
//! Override hierarchy: defaults → `leasy.toml` → env vars → CLI flags.
//! Every field in the file is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::geocoding::nominatim::{DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT};
use crate::proximity::DEFAULT_RADIUS_KM;

pub const DEFAULT_CONFIG_FILE: &str = "leasy.toml";
pub const DEFAULT_DATA_FILE: &str = "items.json";
pub const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LeasyConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub map: MapConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeocodingConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MapConfig {
    pub default_radius_km: Option<f64>,
}

/// Concrete settings after all overrides
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub data_file: PathBuf,
    pub nominatim_url: String,
    pub user_agent: String,
    pub geocoder_timeout: Duration,
    pub default_radius_km: f64,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Reads the config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<LeasyConfig, ConfigError> {
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(LeasyConfig::default());
    }
    let contents = std::fs::read_to_string(path)?;
    let config: LeasyConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Collapses defaults → file → env → CLI. `cli_data_file` is the `--data` flag.
pub fn resolve(config: &LeasyConfig, cli_data_file: Option<&Path>) -> ResolvedConfig {
    resolve_with_env(config, cli_data_file, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &LeasyConfig,
    cli_data_file: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let data_file = cli_data_file
        .map(Path::to_path_buf)
        .or_else(|| env("LEASY_DATA_FILE").map(PathBuf::from))
        .or_else(|| config.store.data_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

    let nominatim_url = env("LEASY_NOMINATIM_URL")
        .or_else(|| config.geocoding.base_url.clone())
        .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_string());

    let user_agent = env("LEASY_USER_AGENT")
        .or_else(|| config.geocoding.user_agent.clone())
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    let default_radius_km = config
        .map
        .default_radius_km
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(DEFAULT_RADIUS_KM);

    // a zero timeout would fail every request
    let timeout_secs = config
        .geocoding
        .timeout_secs
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_GEOCODER_TIMEOUT_SECS);

    ResolvedConfig {
        data_file,
        nominatim_url,
        user_agent,
        geocoder_timeout: Duration::from_secs(timeout_secs),
        default_radius_km,
    }
}
