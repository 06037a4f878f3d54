use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Row count, country filter, sort order and field selection are baked into the query.
pub const DEFAULT_CITIES_URL: &str = "https://public.opendatasoft.com/api/records/1.0/search/?rows=100&disjunctive.country=true&refine.country=United+States&sort=population&start=0&fields=coordinates&dataset=geonames-all-cities-with-a-population-1000&timezone=UTC&lang=en";
pub const DEFAULT_LOCATION_SEARCH_URL: &str = "https://www.metaweather.com/api/location/search/";
pub const DEFAULT_LOCATION_URL: &str = "https://www.metaweather.com/api/location";

/// Remote endpoints queried by the survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Fully-formed city ranking URL.
    pub cities_url: String,
    /// Coordinate search; `lattlong` is appended as a query parameter.
    pub location_search_url: String,
    /// Base for `/{woeid}/{year}/{month}/{day}/` lookups.
    pub location_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            cities_url: DEFAULT_CITIES_URL.to_string(),
            location_search_url: DEFAULT_LOCATION_SEARCH_URL.to_string(),
            location_url: DEFAULT_LOCATION_URL.to_string(),
        }
    }
}

/// Labels used in the summary line. They do not change what is fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub country: String,
    pub unit: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            unit: "C".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [endpoints]
/// location_url = "https://www.metaweather.com/api/location"
///
/// [report]
/// unit = "C"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub endpoints: EndpointConfig,
    pub report: ReportConfig,
}

impl Config {
    /// Load config from the platform config dir, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from an explicit path; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "citytemp", "citytemp")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
