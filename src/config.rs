//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::backend::{BackendResult, InMemoryBackend, MetricsBackend, RestBackend, RestConfig};
use crate::dashboard::DashboardOptions;
use crate::i18n::LanguagePreference;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which store holds the rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted table over REST
    #[default]
    Rest,
    /// Process-local table, lost on exit
    Memory,
}

/// Metrics table backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,

    #[serde(default = "default_backend_url")]
    pub url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_table() -> String {
    "daily_metrics".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            url: default_backend_url(),
            api_key: None,
            table: default_table(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl BackendConfig {
    pub fn rest_config(&self) -> RestConfig {
        RestConfig {
            base_url: self.url.clone(),
            api_key: self.api_key.clone().filter(|k| !k.is_empty()),
            table: self.table.clone(),
            request_timeout_ms: self.request_timeout_secs * 1000,
        }
    }

    /// Construct the configured backend
    pub fn build(&self) -> BackendResult<Arc<dyn MetricsBackend>> {
        match self.kind {
            BackendKind::Rest => {
                let rest = RestBackend::new(self.rest_config())?;
                tracing::info!(url = %self.url, table = %self.table, "Using REST backend");
                Ok(Arc::new(rest))
            }
            BackendKind::Memory => {
                tracing::warn!("Using in-memory backend; rows are lost on exit");
                Ok(Arc::new(InMemoryBackend::new()))
            }
        }
    }
}

/// Dashboard server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8084
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Dashboard behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// "ar", "en" or "auto"
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub follow_submitted_date: bool,
}

fn default_language() -> String {
    "ar".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            follow_submitted_date: false,
        }
    }
}

impl DashboardConfig {
    pub fn language_preference(&self) -> Result<LanguagePreference, ConfigError> {
        self.language.parse().map_err(ConfigError::Invalid)
    }

    /// Options for a dashboard serving a client with the given Accept-Language
    pub fn options(&self, accept_language: Option<&str>) -> Result<DashboardOptions, ConfigError> {
        Ok(DashboardOptions {
            language: self.language_preference()?.resolve(accept_language),
            follow_submitted_date: self.follow_submitted_date,
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load an explicit file, or fall back to the default locations
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("daily-metrics").join("config.toml")),
            Some(PathBuf::from("/etc/daily-metrics/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Backend overrides
        if let Ok(kind) = std::env::var("DAILY_METRICS_BACKEND") {
            match kind.to_lowercase().as_str() {
                "memory" => self.backend.kind = BackendKind::Memory,
                "rest" => self.backend.kind = BackendKind::Rest,
                other => tracing::warn!("Ignoring unknown DAILY_METRICS_BACKEND={}", other),
            }
        }
        if let Ok(url) = std::env::var("DAILY_METRICS_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Ok(key) = std::env::var("DAILY_METRICS_BACKEND_KEY") {
            self.backend.api_key = Some(key);
        }
        if let Ok(table) = std::env::var("DAILY_METRICS_TABLE") {
            self.backend.table = table;
        }

        // Server overrides
        if let Ok(host) = std::env::var("DAILY_METRICS_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("DAILY_METRICS_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Dashboard overrides
        if let Ok(language) = std::env::var("DAILY_METRICS_LANGUAGE") {
            self.dashboard.language = language;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("DAILY_METRICS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("DAILY_METRICS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Daily Metrics Configuration
#
# Environment variables override these settings:
# - DAILY_METRICS_BACKEND (rest | memory)
# - DAILY_METRICS_BACKEND_URL
# - DAILY_METRICS_BACKEND_KEY
# - DAILY_METRICS_TABLE
# - DAILY_METRICS_HOST
# - DAILY_METRICS_PORT
# - DAILY_METRICS_LANGUAGE
# - DAILY_METRICS_LOG_LEVEL
# - DAILY_METRICS_LOG_FORMAT

[backend]
# rest: hosted table over PostgREST; memory: in-process, lost on exit
kind = "rest"

# Project URL of the hosted database
url = "http://localhost:54321"

# API key sent as `apikey` and bearer token
api_key = ""

# Table holding one row per (date, entry)
table = "daily_metrics"

# Request timeout in seconds
request_timeout_secs = 10

[server]
# Dashboard server host
host = "127.0.0.1"

# Dashboard server port
port = 8084

[dashboard]
# Display language: ar, en or auto (detect from the browser)
language = "ar"

# Jump to a submitted entry's date when it differs from the viewed date
follow_submitted_date = false

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/daily-metrics/daily-metrics.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.kind, BackendKind::Rest);
        assert_eq!(config.backend.table, "daily_metrics");
        assert_eq!(config.server.addr(), "127.0.0.1:8084");
        assert_eq!(config.dashboard.language, "ar");
        assert!(!config.dashboard.follow_submitted_date);
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.backend.request_timeout_secs, 10);
        assert_eq!(config.server.port, 8084);
        assert_eq!(config.logging.format, "pretty");

        // An empty key means no key
        assert!(config.backend.rest_config().api_key.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[backend]\nkind = \"memory\"\n\n[dashboard]\nlanguage = \"auto\""
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.backend.kind, BackendKind::Memory);
        assert_eq!(config.backend.url, "http://localhost:54321");

        let options = config.dashboard.options(Some("en-US")).unwrap();
        assert_eq!(options.language, Language::English);
    }

    #[test]
    fn test_load_errors() {
        let err = Config::load(Path::new("/nonexistent/daily-metrics.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"eighty\"").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_invalid_language() {
        let dashboard = DashboardConfig {
            language: "fr".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            dashboard.language_preference(),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rest_config_conversion() {
        let backend = BackendConfig {
            api_key: Some("secret".to_string()),
            request_timeout_secs: 3,
            ..Default::default()
        };
        let rest = backend.rest_config();
        assert_eq!(rest.api_key.as_deref(), Some("secret"));
        assert_eq!(rest.request_timeout_ms, 3000);
    }

    #[test]
    fn test_build_backend() {
        let memory = BackendConfig {
            kind: BackendKind::Memory,
            ..Default::default()
        };
        assert_eq!(memory.build().unwrap().name(), "memory");
        assert_eq!(BackendConfig::default().build().unwrap().name(), "rest");
    }
}
