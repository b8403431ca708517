//! Runtime configuration.
//!
//! Resolution order, later sources overriding earlier ones:
//! 1. Built-in defaults
//! 2. A TOML file, when one is given
//! 3. Environment variables
//!
//! ## Environment Variables
//! - `JURIS_API_BASE_URL`: backend base URL, e.g. `https://api.example.in/api/v1`
//! - `JURIS_API_TIMEOUT_SECS`: timeout for ordinary requests (analysis can be slow)
//! - `JURIS_HEALTH_TIMEOUT_SECS`: timeout for health checks
//! - `JURIS_STORAGE_PATH`: JSON file holding the local storage map

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001/api/v1";
/// AI inference on the backend can take minutes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STORAGE_FILE: &str = "juris-storage.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub timeout: Duration,
    pub health_timeout: Duration,
    pub storage_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            health_timeout: Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS),
            storage_path: PathBuf::from(DEFAULT_STORAGE_FILE),
        }
    }
}

/// On-disk shape; every field optional so partial files work.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
    health_timeout_secs: Option<u64>,
    storage_path: Option<PathBuf>,
}

impl Config {
    /// Load defaults, then the optional file, then the process environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = file {
            config.apply_file(path)?;
            tracing::debug!(path = %path.display(), "applied config file");
        }
        config.apply_env(|k| std::env::var(k).ok())?;
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(url) = file.api_base_url {
            self.api_base_url = url;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.health_timeout_secs {
            self.health_timeout = Duration::from_secs(secs);
        }
        if let Some(p) = file.storage_path {
            self.storage_path = p;
        }
        Ok(())
    }

    /// Apply overrides from an environment lookup. Split out for tests.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(url) = lookup("JURIS_API_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(secs) = env_secs(&lookup, "JURIS_API_TIMEOUT_SECS")? {
            self.timeout = secs;
        }
        if let Some(secs) = env_secs(&lookup, "JURIS_HEALTH_TIMEOUT_SECS")? {
            self.health_timeout = secs;
        }
        if let Some(p) = lookup("JURIS_STORAGE_PATH").filter(|v| !v.trim().is_empty()) {
            self.storage_path = PathBuf::from(p);
        }
        Ok(())
    }
}

fn env_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(|s| Some(Duration::from_secs(s)))
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(c.timeout, Duration::from_secs(300));
        assert_eq!(c.health_timeout, Duration::from_secs(10));
    }

    #[test]
    fn env_overrides() {
        let mut c = Config::default();
        c.apply_env(env(&[
            ("JURIS_API_BASE_URL", "https://api.example.in/api/v1"),
            ("JURIS_API_TIMEOUT_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(c.api_base_url, "https://api.example.in/api/v1");
        assert_eq!(c.timeout, Duration::from_secs(60));
        assert_eq!(c.health_timeout, Duration::from_secs(10));
    }

    #[test]
    fn invalid_env_number() {
        let mut c = Config::default();
        let err = c
            .apply_env(env(&[("JURIS_HEALTH_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                var: "JURIS_HEALTH_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn file_then_env() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            "api_base_url = \"http://file.example/api\"\ntimeout_secs = 120\nstorage_path = \"/tmp/j.json\""
        )
        .unwrap();

        let mut c = Config::default();
        c.apply_file(f.path()).unwrap();
        assert_eq!(c.api_base_url, "http://file.example/api");
        assert_eq!(c.timeout, Duration::from_secs(120));
        assert_eq!(c.storage_path, PathBuf::from("/tmp/j.json"));

        c.apply_env(env(&[("JURIS_API_BASE_URL", "http://env.example/api")]))
            .unwrap();
        assert_eq!(c.api_base_url, "http://env.example/api");
    }

    #[test]
    fn unknown_file_key_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "theme = \"dark\"").unwrap();
        let err = Config::default().apply_file(f.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
