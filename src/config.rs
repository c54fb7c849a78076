//! Application Configuration
//! Optional JSON file with defaults for every field.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "CHARTIFY_CONFIG";
/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "chartify.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Texts shown on the welcome splash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashText {
    pub title: String,
    pub brand: String,
    pub subtitle: String,
}

impl Default for SplashText {
    fn default() -> Self {
        Self {
            title: "Welcome to".to_string(),
            brand: "Chartify Studio".to_string(),
            subtitle: "Visualization Workshop".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the welcome form saves the user profile.
    pub profile_path: PathBuf,
    pub sample_seed: u64,
    pub sample_rows: usize,
    pub histogram_bins: usize,
    pub word_cloud_max_words: usize,
    pub splash: SplashText,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile_path: PathBuf::from("user.json"),
            sample_seed: 42,
            sample_rows: 100,
            histogram_bins: 20,
            word_cloud_max_words: 200,
            splash: SplashText::default(),
            window_size: [1400.0, 850.0],
        }
    }
}

impl AppConfig {
    /// Read a config file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the config path from the environment and load it.
    /// A missing file yields defaults; an unreadable or malformed one is logged.
    pub fn load_or_default() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.profile_path, PathBuf::from("user.json"));
        assert_eq!(config.sample_seed, 42);
        assert_eq!(config.sample_rows, 100);
        assert_eq!(config.histogram_bins, 20);
        assert_eq!(config.word_cloud_max_words, 200);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"sample_rows": 10, "splash": {{"brand": "Acme"}}}}"#).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.sample_rows, 10);
        assert_eq!(config.sample_seed, 42);
        assert_eq!(config.splash.brand, "Acme");
        assert_eq!(config.splash.title, "Welcome to");
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
