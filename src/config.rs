//! Configuration management for TinderMate
//!
//! Configuration is optional: every field has a default, a config file may set
//! any subset of them, and command-line flags override both. A commented
//! default file is written on first run so the knobs are discoverable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::HeaderName;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::auth::{default_credentials_path, Service, ServiceEndpoint, ValidatorConfig};
use crate::constants::{files, http, logging, notifications, ui};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Service endpoints
    pub services: ServicesConfig,
    /// Validation timeouts
    pub validation: ValidationConfig,
    /// Credential storage
    pub storage: StorageConfig,
    /// Terminal UI settings
    pub ui: UiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Endpoint overrides for both services
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ServicesConfig {
    /// OpenAI endpoint settings
    pub openai: ServiceConfig,
    /// Tinder endpoint settings
    pub tinder: ServiceConfig,
}

/// TOML-friendly endpoint settings; unset fields use the built-in endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Authenticated URL that answers 2xx for a good token
    pub check_url: Option<String>,
    /// Header carrying the token
    pub auth_header: Option<String>,
    /// Scheme placed before the token; empty string for none
    pub auth_scheme: Option<String>,
}

/// Validation timeouts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    /// Upper bound for each service check
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// TCP connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
        }
    }
}

/// Credential storage settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Credential file (None = `<config_dir>/tindermate/tokens.json`)
    pub credentials_path: Option<PathBuf>,
}

/// Terminal UI settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Redraw / housekeeping interval in milliseconds
    pub tick_rate_ms: u64,
    /// Display time for notifications that do not ask for one, in seconds
    pub notification_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: ui::TICK_RATE_MS,
            notification_secs: notifications::DEFAULT_DURATION.as_secs(),
        }
    }
}

impl UiConfig {
    /// Tick interval
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Default notification display time
    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
    /// Log file used while the TUI owns the terminal
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
        }
    }
}

impl LoggingConfig {
    /// Log file path, defaulting next to the config file
    pub fn log_file_path(&self) -> ConfigResult<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(app_config_dir()?.join(files::LOG_FILE_NAME)),
        }
    }
}

impl ServiceConfig {
    /// Merge with the built-in endpoint of `service` and validate the result
    pub fn to_runtime_config(&self, service: Service) -> ConfigResult<ServiceEndpoint> {
        let mut endpoint = ServiceEndpoint::default_for(service);
        let section = match service {
            Service::OpenAi => "services.openai",
            Service::Tinder => "services.tinder",
        };

        if let Some(raw) = &self.check_url {
            let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
                field: format!("{}.check_url", section),
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.check_url", section),
                    value: raw.clone(),
                    reason: "Only http and https URLs are supported".to_string(),
                });
            }
            endpoint.check_url = url;
        }

        if let Some(header) = &self.auth_header {
            if HeaderName::from_bytes(header.as_bytes()).is_err() {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.auth_header", section),
                    value: header.clone(),
                    reason: "Not a valid HTTP header name".to_string(),
                });
            }
            endpoint.auth_header = header.clone();
        }

        if let Some(scheme) = &self.auth_scheme {
            let scheme = scheme.trim();
            endpoint.auth_scheme = (!scheme.is_empty()).then(|| scheme.to_string());
        }

        Ok(endpoint)
    }
}

impl AppConfig {
    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (explicit path, or the first one found)
    ///
    /// CLI overrides are applied by the caller on the returned value.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file()?,
        };

        let config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Initialize configuration on first run
    ///
    /// Creates a default config file if none exists and tells the user where
    /// it is
    pub async fn initialize_first_run() -> ConfigResult<PathBuf> {
        let config_path = Self::get_default_config_path()?;

        if config_path.exists() {
            return Ok(config_path);
        }

        info!("Creating default configuration file...");

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&config_path, Self::generate_default_config_content())
            .await
            .map_err(|source| ConfigError::Io {
                path: config_path.clone(),
                source,
            })?;

        println!("Created default configuration file:");
        println!("   {}", config_path.display());
        println!("   You can customize settings by editing this file.");
        println!();

        Ok(config_path)
    }

    /// Check values that deserialize fine but cannot work
    pub fn validate(&self) -> ConfigResult<()> {
        self.validator_config()?;

        if self.validation.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "validation.timeout".to_string(),
                value: "0s".to_string(),
                reason: "Timeout must be greater than zero".to_string(),
            });
        }

        if self.ui.tick_rate_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ui.tick_rate_ms".to_string(),
                value: "0".to_string(),
                reason: "Tick rate must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Runtime validator settings
    pub fn validator_config(&self) -> ConfigResult<ValidatorConfig> {
        Ok(ValidatorConfig {
            timeout: self.validation.timeout,
            connect_timeout: self.validation.connect_timeout,
            openai: self.services.openai.to_runtime_config(Service::OpenAi)?,
            tinder: self.services.tinder.to_runtime_config(Service::Tinder)?,
        })
    }

    /// Credential file location
    pub fn credentials_path(&self) -> ConfigResult<PathBuf> {
        match &self.storage.credentials_path {
            Some(path) => Ok(path.clone()),
            None => default_credentials_path(),
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> ConfigResult<Option<PathBuf>> {
        let search_paths = vec![
            // Project-local config
            PathBuf::from(".").join(files::LOCAL_CONFIG_FILE_NAME),
            // User config
            Self::get_default_config_path()?,
        ];

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    /// Get the default config file path for the current user
    pub fn get_default_config_path() -> ConfigResult<PathBuf> {
        Ok(app_config_dir()?.join(files::CONFIG_FILE_NAME))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Generate default configuration content with helpful comments
    fn generate_default_config_content() -> String {
        format!(
            r#"# TinderMate Configuration
# This file was automatically generated on first run.
# Every setting is optional; remove a line to fall back to its default.

[services.openai]
# Endpoint used to check the OpenAI token
# check_url = "{openai_url}"
# auth_header = "{openai_header}"
# auth_scheme = "{openai_scheme}"

[services.tinder]
# Endpoint used to check the Tinder token
# check_url = "{tinder_url}"
# auth_header = "{tinder_header}"
# auth_scheme = ""

[validation]
# Upper bound for each service check (e.g. "10s", "1m")
timeout = "{timeout}"
connect_timeout = "{connect_timeout}"

[storage]
# Where validated tokens are kept (leave unset for the default location)
# credentials_path = "/path/to/tokens.json"

[ui]
tick_rate_ms = {tick_rate}
# Seconds a notification stays on screen unless it asks for longer
notification_secs = {notification_secs}

[logging]
level = "info"  # error, warn, info, debug, trace
# log_file = "/path/to/tindermate.log"
"#,
            openai_url = crate::constants::services::OPENAI_CHECK_URL,
            openai_header = crate::constants::services::OPENAI_AUTH_HEADER,
            openai_scheme = crate::constants::services::OPENAI_AUTH_SCHEME,
            tinder_url = crate::constants::services::TINDER_CHECK_URL,
            tinder_header = crate::constants::services::TINDER_AUTH_HEADER,
            timeout = humantime_serde::re::humantime::format_duration(http::DEFAULT_TIMEOUT),
            connect_timeout = humantime_serde::re::humantime::format_duration(http::CONNECT_TIMEOUT),
            tick_rate = ui::TICK_RATE_MS,
            notification_secs = notifications::DEFAULT_DURATION.as_secs(),
        )
    }
}

/// `<config_dir>/tindermate`
fn app_config_dir() -> ConfigResult<PathBuf> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir.join(files::APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_default_config_creation() {
        let config = AppConfig::default();

        assert_eq!(config.validation.timeout, http::DEFAULT_TIMEOUT);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.ui.tick_rate(), Duration::from_millis(ui::TICK_RATE_MS));
        assert!(config.validate().is_ok());

        let validator = config.validator_config().unwrap();
        assert_eq!(validator.openai, ServiceEndpoint::default_for(Service::OpenAi));
        assert_eq!(validator.tinder, ServiceEndpoint::default_for(Service::Tinder));
    }

    #[tokio::test]
    async fn test_config_file_generation() {
        let content = AppConfig::generate_default_config_content();

        // Should be valid TOML that matches the defaults
        let parsed: AppConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed, AppConfig::default());
        assert!(content.contains("# TinderMate Configuration"));
        assert!(content.contains("[services.openai]"));
        assert!(content.contains("[validation]"));
    }

    #[tokio::test]
    async fn test_config_loading_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        // Should fail when explicitly specified
        let result = AppConfig::load(Some(config_path)).await;
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_config_loading_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let test_config = r#"
[services.tinder]
check_url = "http://localhost:8080/v2/profile"
auth_scheme = "Token"

[validation]
timeout = "3s"

[storage]
credentials_path = "/tmp/tindermate-test/tokens.json"

[logging]
level = "debug"
"#;
        tokio::fs::write(&config_path, test_config).await.unwrap();

        let config = AppConfig::load(Some(config_path)).await.unwrap();

        assert_eq!(config.validation.timeout, Duration::from_secs(3));
        assert_eq!(config.validation.connect_timeout, http::CONNECT_TIMEOUT);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.credentials_path().unwrap(),
            PathBuf::from("/tmp/tindermate-test/tokens.json")
        );

        let validator = config.validator_config().unwrap();
        assert_eq!(validator.tinder.check_url.as_str(), "http://localhost:8080/v2/profile");
        assert_eq!(validator.tinder.auth_header, "X-Auth-Token");
        assert_eq!(validator.tinder.auth_scheme.as_deref(), Some("Token"));
        // Untouched service keeps its built-in endpoint
        assert_eq!(validator.openai, ServiceEndpoint::default_for(Service::OpenAi));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = AppConfig::default();
        config.services.openai.check_url = Some("not a url".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "services.openai.check_url"
        ));

        let mut config = AppConfig::default();
        config.services.openai.check_url = Some("ftp://example.com/models".to_string());
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.services.tinder.auth_header = Some("Bad Header".to_string());
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.validation.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_scheme_disables_prefix() {
        let service = ServiceConfig {
            auth_scheme: Some(String::new()),
            ..Default::default()
        };
        let endpoint = service.to_runtime_config(Service::OpenAi).unwrap();
        assert_eq!(endpoint.auth_scheme, None);
    }

    #[tokio::test]
    async fn test_malformed_file_is_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        tokio::fs::write(&config_path, "[validation\ntimeout = ").await.unwrap();

        let result = AppConfig::load(Some(config_path)).await;
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }
}
