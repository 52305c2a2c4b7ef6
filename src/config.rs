//! Sortie configuration.
//!
//! Loaded from `~/.sortie/config.toml`. Every field has a default, and a
//! missing file means "all defaults" — the tool must work with zero setup.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

/// Sortie configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Override for the storage root (default `~/.sortie/`).
    pub data_dir: Option<PathBuf>,

    /// How old a snapshot may be before match results are flagged as
    /// possibly stale. The record data refreshes on this cadence.
    pub max_snapshot_age_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            max_snapshot_age_seconds: 15,
        }
    }
}

impl Config {
    /// Load config from `~/.sortie/config.toml`, falling back to defaults
    /// when the file doesn't exist. An unreadable or invalid file is an
    /// error, not a silent fallback.
    pub fn load() -> Result<Self, String> {
        let path = Self::path().ok_or("could not determine home directory")?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.sortie/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".sortie").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_refresh_cadence() {
        let config = Config::default();
        assert_eq!(config.max_snapshot_age_seconds, 15);
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: Config = toml::from_str("data-dir = \"/tmp/ops\"").unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/ops")));
        assert_eq!(config.max_snapshot_age_seconds, 15);
    }

    #[test]
    fn age_bound_is_configurable() {
        let config: Config = toml::from_str("max-snapshot-age-seconds = 60").unwrap();
        assert_eq!(config.max_snapshot_age_seconds, 60);
    }
}
