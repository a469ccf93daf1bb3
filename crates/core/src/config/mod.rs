//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SCRIBE_SW_*)
//! 2. TOML config file (if SCRIBE_SW_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The cache generation name and the manifest are compiled in and are not
//! part of the configuration.

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SCRIBE_SW_*)
/// 2. TOML config file (if SCRIBE_SW_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache storage.
    ///
    /// Set via SCRIBE_SW_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Scope URL of the controlled application.
    ///
    /// Relative manifest entries resolve against it and its origin decides
    /// which responses count as same-origin.
    /// Set via SCRIBE_SW_SCOPE environment variable.
    #[serde(default = "default_scope")]
    pub scope: String,

    /// User-Agent string for network requests.
    ///
    /// Set via SCRIBE_SW_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to read per response body.
    ///
    /// Set via SCRIBE_SW_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Maximum number of redirects to follow.
    ///
    /// Set via SCRIBE_SW_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./scribe-sw-cache.sqlite")
}

fn default_scope() -> String {
    "http://localhost:8080/".into()
}

fn default_user_agent() -> String {
    "scribe-sw/0.1".into()
}

fn default_max_bytes() -> usize {
    10_485_760 // 10MB
}

fn default_max_redirects() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            scope: default_scope(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SCRIBE_SW_`
    /// 2. TOML file from `SCRIBE_SW_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SCRIBE_SW_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SCRIBE_SW_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Parsed scope URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the scope is not an absolute http(s) URL.
    pub fn scope_url(&self) -> Result<url::Url, ConfigError> {
        let parsed = url::Url::parse(&self.scope)
            .map_err(|e| ConfigError::Invalid { field: "scope".into(), reason: e.to_string() })?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(ConfigError::Invalid {
                field: "scope".into(),
                reason: format!("unsupported scheme: {scheme}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./scribe-sw-cache.sqlite"));
        assert_eq!(config.scope, "http://localhost:8080/");
        assert_eq!(config.user_agent, "scribe-sw/0.1");
        assert_eq!(config.max_bytes, 10_485_760);
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_scope_url() {
        let config = AppConfig::default();
        let scope = config.scope_url().unwrap();
        assert_eq!(scope.host_str(), Some("localhost"));
        assert_eq!(scope.port(), Some(8080));
    }

    #[test]
    fn test_scope_url_rejects_relative() {
        let config = AppConfig { scope: "/app/".into(), ..Default::default() };
        assert!(matches!(config.scope_url(), Err(ConfigError::Invalid { field, .. }) if field == "scope"));
    }

    #[test]
    fn test_scope_url_rejects_file_scheme() {
        let config = AppConfig { scope: "file:///srv/app/".into(), ..Default::default() };
        assert!(matches!(config.scope_url(), Err(ConfigError::Invalid { field, .. }) if field == "scope"));
    }
}
