//! Configuration for the VIGIL dashboard.
//!
//! Loaded from YAML at `~/.vigil/config.yaml`; every field has a serde
//! default so an absent file simply yields the defaults. Invalid YAML or
//! out-of-range values fail startup with guidance.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VigilError};

fn default_bot_status_url() -> String {
    "http://localhost:8080/api/status".to_string()
}

fn default_site_check_url() -> String {
    "http://localhost:8080/api/checks".to_string()
}

fn default_status_refresh_secs() -> u64 {
    60
}

fn default_history_refresh_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    10
}

/// Dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VigilConfig {
    /// Live-bot-status endpoint (GET, `{success, data: {id: ...}}`)
    #[serde(default = "default_bot_status_url")]
    pub bot_status_url: String,

    /// Site-check endpoint (GET, `{success, data: [...]}`)
    #[serde(default = "default_site_check_url")]
    pub site_check_url: String,

    /// Static key sent as the `Authorization` header on bot-status requests
    #[serde(default)]
    pub auth_key: Option<String>,

    /// Silent live-status refresh period in seconds
    #[serde(default = "default_status_refresh_secs")]
    pub status_refresh_secs: u64,

    /// Site-check refresh period in seconds
    #[serde(default = "default_history_refresh_secs")]
    pub history_refresh_secs: u64,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// History cache file (defaults to `~/.vigil/history.json`)
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
}

impl Default for VigilConfig {
    fn default() -> Self {
        Self {
            bot_status_url: default_bot_status_url(),
            site_check_url: default_site_check_url(),
            auth_key: None,
            status_refresh_secs: default_status_refresh_secs(),
            history_refresh_secs: default_history_refresh_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            cache_path: None,
        }
    }
}

impl VigilConfig {
    /// Load configuration.
    ///
    /// With an explicit `path`, the file must exist. Without one, the
    /// default location is used and an absent file yields the defaults.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let (path, must_exist) = match path {
            Some(p) => (p, true),
            None => (default_config_path()?, false),
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if must_exist {
                    return Err(VigilError::ConfigNotFound {
                        path,
                        source: Some(e),
                    });
                }
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => return Err(VigilError::io("reading config file", path, e)),
        };

        let config: Self = serde_yaml::from_str(&content).map_err(|e| VigilError::ConfigInvalid {
            path: path.clone(),
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate field values.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("bot_status_url", &self.bot_status_url),
            ("site_check_url", &self.site_check_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(VigilError::ConfigValidation {
                    message: format!("{name} must be an http(s) URL, got {url:?}"),
                });
            }
        }

        for (name, secs) in [
            ("status_refresh_secs", self.status_refresh_secs),
            ("history_refresh_secs", self.history_refresh_secs),
            ("request_timeout_secs", self.request_timeout_secs),
        ] {
            if secs == 0 {
                return Err(VigilError::ConfigValidation {
                    message: format!("{name} must be at least 1 second"),
                });
            }
        }

        Ok(())
    }

    /// Resolved history cache path.
    pub fn cache_path(&self) -> Result<PathBuf> {
        match &self.cache_path {
            Some(p) => Ok(p.clone()),
            None => Ok(default_data_dir()?.join("history.json")),
        }
    }

    /// Silent live-status refresh period.
    pub fn status_refresh(&self) -> Duration {
        Duration::from_secs(self.status_refresh_secs)
    }

    /// Site-check refresh period.
    pub fn history_refresh(&self) -> Duration {
        Duration::from_secs(self.history_refresh_secs)
    }

    /// Per-request HTTP timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Default configuration file path (`~/.vigil/config.yaml`).
pub fn default_config_path() -> Result<PathBuf> {
    Ok(default_data_dir()?.join("config.yaml"))
}

/// VIGIL data directory (`~/.vigil/`).
pub fn default_data_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| VigilError::Internal {
        message: "could not determine home directory".into(),
    })?;
    Ok(home.join(".vigil"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = VigilConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.status_refresh(), Duration::from_secs(60));
        assert_eq!(config.history_refresh(), Duration::from_secs(300));
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let err = VigilConfig::load(Some(PathBuf::from("/nonexistent/vigil.yaml"))).unwrap_err();
        assert!(matches!(err, VigilError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_load_partial_yaml_uses_field_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "bot_status_url: \"https://api.example.com/status\"").unwrap();
        writeln!(f, "auth_key: \"SECRET_KEY_2026\"").unwrap();

        let config = VigilConfig::load(Some(path)).unwrap();
        assert_eq!(config.bot_status_url, "https://api.example.com/status");
        assert_eq!(config.auth_key.as_deref(), Some("SECRET_KEY_2026"));
        assert_eq!(config.status_refresh_secs, 60);
        assert_eq!(config.history_refresh_secs, 300);
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "status_refresh_secs: [not a number").unwrap();

        let err = VigilConfig::load(Some(path)).unwrap_err();
        assert!(matches!(err, VigilError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_period() {
        let config = VigilConfig {
            status_refresh_secs: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, VigilError::ConfigValidation { .. }));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = VigilConfig {
            site_check_url: "ftp://example.com".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
