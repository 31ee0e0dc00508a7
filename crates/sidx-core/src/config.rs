//! Global configuration for the sidx cache.
//!
//! Configuration is a single TOML file, written with defaults on first
//! load. The directory resolves from `SIDX_CONFIG_DIR`, then
//! `XDG_CONFIG_HOME/sidx`, then `~/.sidx`. `paths.root` feeds
//! [`crate::Storage::new`]; `defaults.max_results` is the CLI's search
//! limit when no flag is given.
//!
//! ```toml
//! [defaults]
//! refresh_hours = 24
//! max_results = 50
//! fetch_enabled = true
//!
//! [paths]
//! root = "/home/user/.sidx"
//! ```

use crate::{Error, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Global configuration for the sidx cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default settings applied to all sources.
    pub defaults: DefaultsConfig,
    /// File system paths.
    pub paths: PathsConfig,
}

/// Default settings applied to all sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// How often cached indexes are considered stale, in hours.
    pub refresh_hours: u32,
    /// Default search result limit.
    pub max_results: usize,
    /// Whether fetching from remote sources is enabled. When disabled
    /// only locally cached indexes are used.
    pub fetch_enabled: bool,
}

/// File system paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root directory for cached sources and indexes.
    pub root: PathBuf,
}

impl Config {
    /// Load configuration from the default location, creating the file
    /// with defaults when absent. A malformed file is an error, not a
    /// silent fallback.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, creating the file with
    /// defaults when absent.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .map_err(|e| Error::Config(format!("failed to read config: {e}")))?;
            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("failed to parse config: {e}")))
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    /// Save the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save the configuration to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("failed to create config dir: {e}")))?;
        }
        let toml = toml::to_string_pretty(self)?;
        fs::write(config_path, toml)
            .map_err(|e| Error::Config(format!("failed to write config: {e}")))?;
        Ok(())
    }

    /// Resolve the config file path, honoring directory overrides.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("SIDX_CONFIG_DIR") {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            let trimmed = xdg.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed).join("sidx"));
            }
        }

        let base = BaseDirs::new()
            .ok_or_else(|| Error::Config("failed to determine config directory".into()))?;
        Ok(base.home_dir().join(".sidx"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: DefaultsConfig {
                refresh_hours: 24,
                max_results: 50,
                fetch_enabled: true,
            },
            paths: PathsConfig {
                root: default_root(),
            },
        }
    }
}

/// Default data root: `XDG_DATA_HOME/sidx` when set, else `~/.sidx`.
fn default_root() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        let trimmed = xdg.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed).join("sidx");
        }
    }
    BaseDirs::new().map_or_else(|| PathBuf::from(".sidx"), |b| b.home_dir().join(".sidx"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.defaults.refresh_hours, 24);
        assert_eq!(config.defaults.max_results, 50);
        assert!(config.defaults.fetch_enabled);
    }

    #[test]
    fn toml_round_trip() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.defaults.refresh_hours, config.defaults.refresh_hours);
        assert_eq!(parsed.paths.root, config.paths.root);
    }

    #[test]
    fn first_load_persists_the_default_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists(), "load must create the file");
        assert!(config.defaults.fetch_enabled);

        let mut edited = config;
        edited.defaults.max_results = 7;
        edited.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.defaults.max_results, 7);
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("defaults = \"nope\"");
        assert!(result.is_err());
    }
}
