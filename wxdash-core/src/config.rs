use anyhow::{Context, Result, anyhow, bail};
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::{debug, info};

use crate::suntime::Site;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8787";
pub const DEFAULT_HISTORY_LIMIT: u32 = 144;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;

/// Dashboard configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "http://localhost:8787"
/// latitude = 52.37
/// longitude = 4.9
/// elevation = 2.0
/// timezone = "Europe/Amsterdam"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the station service exposing `/latest` and `/metar`.
    pub base_url: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Metres above sea level.
    pub elevation: f64,
    /// IANA timezone name used for every displayed time. Should be the
    /// site's own zone: day and night are decided on its wall-clock hours.
    pub timezone: String,
    /// How many observations to fetch for the charts.
    pub history_limit: u32,
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            elevation: 0.0,
            timezone: "UTC".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load config from disk (or defaults on first run), then apply
    /// `WXDASH_*` environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wxdash", "wxdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override fields from `WXDASH_*` variables, looked up through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        fn parsed<T: std::str::FromStr>(key: &str, raw: String) -> Result<T>
        where
            T::Err: std::fmt::Display,
        {
            raw.trim().parse::<T>().map_err(|e| anyhow!("Invalid value for {key}: {e}"))
        }

        if let Some(v) = lookup("WXDASH_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("WXDASH_LATITUDE") {
            self.latitude = parsed("WXDASH_LATITUDE", v)?;
        }
        if let Some(v) = lookup("WXDASH_LONGITUDE") {
            self.longitude = parsed("WXDASH_LONGITUDE", v)?;
        }
        if let Some(v) = lookup("WXDASH_ELEVATION") {
            self.elevation = parsed("WXDASH_ELEVATION", v)?;
        }
        if let Some(v) = lookup("WXDASH_TIMEZONE") {
            self.timezone = v;
        }
        if let Some(v) = lookup("WXDASH_HISTORY_LIMIT") {
            self.history_limit = parsed("WXDASH_HISTORY_LIMIT", v)?;
        }
        if let Some(v) = lookup("WXDASH_FETCH_TIMEOUT_SECS") {
            self.fetch_timeout_secs = parsed("WXDASH_FETCH_TIMEOUT_SECS", v)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            bail!(
                "Invalid latitude: {}. Must be between -90 and 90",
                self.latitude
            );
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            bail!(
                "Invalid longitude: {}. Must be between -180 and 180",
                self.longitude
            );
        }
        if !self.elevation.is_finite() {
            bail!("Invalid elevation: {}", self.elevation);
        }
        if self.history_limit == 0 {
            bail!("history_limit must be positive");
        }
        if self.fetch_timeout_secs == 0 {
            bail!("fetch_timeout_secs must be positive");
        }
        self.tz()?;
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| anyhow!("Invalid timezone: {}", self.timezone))
    }

    pub fn site(&self) -> Site {
        Site {
            latitude: self.latitude,
            longitude: self.longitude,
            elevation: self.elevation,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        cfg.validate().expect("defaults must validate");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            latitude = 52.37
            longitude = 4.9
            timezone = "Europe/Amsterdam"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.latitude, 52.37);
        assert_eq!(cfg.history_limit, DEFAULT_HISTORY_LIMIT);
        assert_eq!(cfg.tz().unwrap(), chrono_tz::Europe::Amsterdam);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[
            ("WXDASH_BASE_URL", "http://station.lan:9000"),
            ("WXDASH_LATITUDE", "51.5"),
            ("WXDASH_TIMEZONE", "Europe/London"),
            ("WXDASH_HISTORY_LIMIT", "24"),
        ]))
        .unwrap();

        assert_eq!(cfg.base_url, "http://station.lan:9000");
        assert_eq!(cfg.latitude, 51.5);
        assert_eq!(cfg.longitude, 0.0);
        assert_eq!(cfg.timezone, "Europe/London");
        assert_eq!(cfg.history_limit, 24);
    }

    #[test]
    fn env_override_with_bad_number_errors() {
        let mut cfg = Config::default();
        let err = cfg.apply_env(env(&[("WXDASH_ELEVATION", "high")])).unwrap_err();
        assert!(err.to_string().contains("WXDASH_ELEVATION"));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let cfg = Config {
            latitude: 91.0,
            ..Config::default()
        };
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("Invalid latitude"));

        let cfg = Config {
            timezone: "Mars/Olympus".into(),
            ..Config::default()
        };
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("Invalid timezone"));

        let cfg = Config {
            history_limit: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("wxdash-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let cfg = Config {
            latitude: 47.5,
            timezone: "Europe/Zurich".into(),
            ..Config::default()
        };

        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(loaded, cfg);
    }
}
