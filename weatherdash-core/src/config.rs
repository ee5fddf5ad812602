use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    alerts::Thresholds,
    model::{Coordinates, LocationQuery, parse_coordinates},
};

/// Environment variable that overrides the API key from the config file.
pub const API_KEY_ENV: &str = "WEATHERAPI_KEY";

pub const DEFAULT_LOCATION: &str = "Bangalore";
pub const DEFAULT_FORECAST_DAYS: u8 = 5;
pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_location = "Bangalore"
/// home = "12.97,77.59"
///
/// [thresholds]
/// wind_kph = 30.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// WeatherAPI.com key. `WEATHERAPI_KEY` wins when set.
    pub api_key: Option<String>,

    /// Location fetched when the dashboard starts.
    pub default_location: Option<String>,

    pub forecast_days: Option<u8>,

    pub base_url: Option<String>,

    /// Unset means the HTTP stack's default.
    pub request_timeout_secs: Option<u64>,

    /// `"lat,lon"` used for "use my location".
    pub home: Option<String>,

    pub thresholds: Thresholds,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherdash", "weatherdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment, falling back to the file.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key_with_env(std::env::var(API_KEY_ENV).ok())
    }

    /// Same as [`Config::resolved_api_key`] with the environment value passed in.
    /// Blank values count as absent.
    pub fn api_key_with_env(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    pub fn default_location_query(&self) -> Result<LocationQuery> {
        self.default_location
            .as_deref()
            .unwrap_or(DEFAULT_LOCATION)
            .parse()
            .context("Invalid default_location in config")
    }

    pub fn forecast_days(&self) -> u8 {
        self.forecast_days.unwrap_or(DEFAULT_FORECAST_DAYS).clamp(1, 14)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Home coordinates, if configured and valid.
    pub fn home_coordinates(&self) -> Option<Coordinates> {
        self.home.as_deref().and_then(parse_coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let cfg = Config::default();

        assert_eq!(cfg.default_location_query().unwrap(), LocationQuery::Place("Bangalore".into()));
        assert_eq!(cfg.forecast_days(), 5);
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert!(cfg.request_timeout().is_none());
        assert!(cfg.home_coordinates().is_none());
        assert_eq!(cfg.thresholds, Thresholds::default());
    }

    #[test]
    fn env_key_overrides_file_key() {
        let cfg = Config { api_key: Some("FILE_KEY".into()), ..Default::default() };

        assert_eq!(cfg.api_key_with_env(Some("ENV_KEY".into())).as_deref(), Some("ENV_KEY"));
        assert_eq!(cfg.api_key_with_env(None).as_deref(), Some("FILE_KEY"));
        assert_eq!(cfg.api_key_with_env(Some("  ".into())).as_deref(), Some("FILE_KEY"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let cfg = Config { api_key: Some(String::new()), ..Default::default() };
        assert!(cfg.api_key_with_env(None).is_none());
    }

    #[test]
    fn parses_partial_toml() {
        let cfg = Config::from_toml(
            r#"
            api_key = "KEY"
            default_location = "Oslo"
            home = "59.91,10.75"
            forecast_days = 3

            [thresholds]
            wind_kph = 40.0
            "#,
        )
        .unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.default_location_query().unwrap(), LocationQuery::Place("Oslo".into()));
        assert_eq!(cfg.forecast_days(), 3);
        assert_eq!(
            cfg.home_coordinates(),
            Some(Coordinates { latitude: 59.91, longitude: 10.75 })
        );
        assert_eq!(cfg.thresholds.wind_kph, 40.0);
        assert_eq!(cfg.thresholds.uv_index, Thresholds::default().uv_index);
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            home: Some("1.5,2.5".into()),
            ..Default::default()
        };
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn forecast_days_are_clamped() {
        let cfg = Config { forecast_days: Some(0), ..Default::default() };
        assert_eq!(cfg.forecast_days(), 1);
    }
}
