//! # Server Configuration
//!
//! JSON config file with serde defaults; a missing file yields the default
//! configuration so a bare `confero serve` works out of the box.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_server::HttpServerConfig;
use crate::tasks::EmailConfig;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Full server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP bind and CORS settings
    pub http: HttpServerConfig,
    /// Shared secret for bearer-token verification
    pub jwt_secret: String,
    /// SMTP settings; absent means confirmation mail is only recorded
    pub smtp: Option<EmailConfig>,
    /// Seconds between announcement cache refreshes
    pub announcement_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http: HttpServerConfig::default(),
            jwt_secret: "change-me".to_string(),
            smtp: None,
            announcement_interval_secs: 300,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = ServerConfig::load(Path::new("/nonexistent/confero.json")).unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.announcement_interval_secs, 300);
        assert!(config.smtp.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("confero.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{"jwt_secret":"s3cret","http":{{"port":9999}}}}"#).unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.http.port, 9999);
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.announcement_interval_secs, 300);
    }

    #[test]
    fn test_malformed_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("confero.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ServerConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
