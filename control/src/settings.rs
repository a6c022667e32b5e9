//! Settings for the proxy binary

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ControlError;
use crate::logs::LogLevel;

/// Proxy settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Bind configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Upstream platform API
    #[serde(default)]
    pub upstream: UpstreamSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            server: ServerSettings::default(),
            upstream: UpstreamSettings::default(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ControlError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Server bind settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upstream platform API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamSettings {
    /// Base URL of the platform API
    #[serde(default = "default_upstream_base")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_upstream_base() -> String {
    "https://api.digitalocean.com/v2".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: default_upstream_base(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, LogLevel::Info);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8787);
        assert_eq!(settings.upstream.base_url, "https://api.digitalocean.com/v2");
        assert_eq!(settings.upstream.request_timeout_secs, 30);
    }

    #[test]
    fn test_settings_partial_json() {
        let raw = r#"{"log_level":"debug","server":{"port":9000}}"#;
        let settings: Settings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.upstream.base_url, "https://api.digitalocean.com/v2");
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = Settings::default();
        let raw = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.server.port, settings.server.port);
        assert_eq!(parsed.log_level, settings.log_level);
    }
}
