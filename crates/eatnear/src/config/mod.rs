//! Finder configuration: defaults, a fluent builder and a JSON config file.
//!
//! Lookup order for the file is `$EATNEAR_CONFIG`, then
//! `<platform config dir>/eatnear/config.json`. A missing platform file means
//! defaults; a missing `$EATNEAR_CONFIG` file is an error. `$EATNEAR_API_KEY`
//! always wins over the file's key.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use eatnear_places::{DEFAULT_CATEGORY, DEFAULT_ENDPOINT, DEFAULT_PAGE_SIZE, DEFAULT_RADIUS_METERS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{
    coordinate::Coordinates,
    error::{EatnearError, Result},
    geolocation::{DEFAULT_PROMPT_TIMEOUT, PermissionState},
};

pub const CONFIG_PATH_ENV: &str = "EATNEAR_CONFIG";
pub const API_KEY_ENV: &str = "EATNEAR_API_KEY";
const CONFIG_FILE_NAME: &str = "config.json";

/// Pre-filled form values (central Stockholm).
pub const DEFAULT_LATITUDE: f64 = 59.334591;
pub const DEFAULT_LONGITUDE: f64 = 18.063240;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Parameters of the explore call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub api_key: String,
    pub endpoint: String,
    pub radius_meters: u32,
    pub category: String,
    pub page_size: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            radius_meters: DEFAULT_RADIUS_METERS,
            category: DEFAULT_CATEGORY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// What the configured device reports when asked for its location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub permission: PermissionState,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Everything a [`RestaurantFinder`](crate::RestaurantFinder) needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    #[serde(flatten)]
    pub search: SearchSettings,
    pub prompt_timeout_secs: u64,
    pub http_timeout_secs: u64,
    pub initial_latitude: f64,
    pub initial_longitude: f64,
    /// `None` means the host has no geolocation support.
    pub device: Option<DeviceConfig>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            search: SearchSettings::default(),
            prompt_timeout_secs: DEFAULT_PROMPT_TIMEOUT.as_secs(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            initial_latitude: DEFAULT_LATITUDE,
            initial_longitude: DEFAULT_LONGITUDE,
            device: None,
        }
    }
}

impl FinderConfig {
    pub fn builder() -> FinderConfigBuilder {
        FinderConfigBuilder::new()
    }

    pub const fn prompt_timeout(&self) -> Duration {
        Duration::from_secs(self.prompt_timeout_secs)
    }

    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Load from the default location, then apply environment overrides.
    #[instrument(name = "Load config", level = "debug")]
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with environment lookups going through `lookup`.
    ///
    /// A path named by `$EATNEAR_CONFIG` must exist; only the platform default
    /// path may be missing.
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_path = lookup(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty());
        let mut config = if let Some(path) = env_path {
            let path = PathBuf::from(path);
            if !path.is_file() {
                return Err(EatnearError::ConfigError(format!(
                    "{CONFIG_PATH_ENV} points to {}, which is not a file",
                    path.display()
                )));
            }
            Self::load_from(&path)?
        } else {
            match default_config_path() {
                Some(path) if path.exists() => Self::load_from(&path)?,
                Some(path) => {
                    debug!(path = %path.display(), "No config file, using defaults");
                    Self::default()
                }
                None => Self::default(),
            }
        };
        config.apply_env_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file. Environment is not consulted.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Apply `EATNEAR_API_KEY` (looked up through `lookup`) over the file value.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            debug!("API key taken from environment");
            self.search.api_key = key;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.radius_meters == 0 {
            return Err(EatnearError::ConfigError(
                "radius_meters must be positive".to_string(),
            ));
        }
        if self.search.page_size == 0 {
            return Err(EatnearError::ConfigError(
                "page_size must be positive".to_string(),
            ));
        }
        if self.search.category.trim().is_empty() {
            return Err(EatnearError::ConfigError(
                "category must not be empty".to_string(),
            ));
        }
        if self.prompt_timeout_secs == 0 {
            return Err(EatnearError::ConfigError(
                "prompt_timeout_secs must be positive".to_string(),
            ));
        }
        if self.http_timeout_secs == 0 {
            return Err(EatnearError::ConfigError(
                "http_timeout_secs must be positive".to_string(),
            ));
        }
        Coordinates::new(self.initial_latitude, self.initial_longitude).map_err(|e| {
            EatnearError::ConfigError(format!("invalid initial position: {e}"))
        })?;
        Ok(())
    }

    /// Write as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(feature = "system-dirs")]
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "eatnear")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(not(feature = "system-dirs"))]
pub fn default_config_path() -> Option<PathBuf> {
    None
}

/// Builder for creating finder configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct FinderConfigBuilder {
    config: FinderConfig,
}

impl FinderConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: FinderConfig::default(),
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.search.api_key = key.into();
        self
    }

    /// Point searches at another explore-compatible endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.search.endpoint = endpoint.into();
        self
    }

    pub fn radius_meters(mut self, radius: u32) -> Self {
        self.config.search.radius_meters = radius;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.config.search.category = category.into();
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.config.search.page_size = size;
        self
    }

    /// Wait for a position on the prompt path, rounded down to whole seconds
    pub fn prompt_timeout(mut self, timeout: Duration) -> Self {
        self.config.prompt_timeout_secs = timeout.as_secs();
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout_secs = timeout.as_secs();
        self
    }

    /// Values the form starts with
    pub fn initial_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.config.initial_latitude = latitude;
        self.config.initial_longitude = longitude;
        self
    }

    pub fn device(mut self, device: DeviceConfig) -> Self {
        self.config.device = Some(device);
        self
    }

    /// Build and validate the final configuration
    pub fn build(self) -> Result<FinderConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
