//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::dashboard::RefreshPolicy;
use crate::filters::TopN;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unset means requests never time out
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

/// Where the CLI keeps its session token
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    pub token_file: Option<PathBuf>,
}

impl SessionConfig {
    pub fn token_path(&self) -> PathBuf {
        self.token_file
            .clone()
            .unwrap_or_else(crate::session::default_token_path)
    }
}

/// Dashboard behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_top_n")]
    pub default_top_n: u32,

    #[serde(default)]
    pub refresh_policy: RefreshPolicy,
}

fn default_top_n() -> u32 {
    TopN::BACKEND_DEFAULT.get()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            refresh_policy: RefreshPolicy::default(),
        }
    }
}

impl DashboardConfig {
    pub fn top_n(&self) -> TopN {
        TopN::new(self.default_top_n).unwrap_or_default()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
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

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
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

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("expense-dash").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("EXPENSE_DASH_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("EXPENSE_DASH_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.api.request_timeout_secs = Some(t);
            }
        }

        if let Ok(path) = std::env::var("EXPENSE_DASH_TOKEN_FILE") {
            self.session.token_file = Some(PathBuf::from(path));
        }

        if let Ok(policy) = std::env::var("EXPENSE_DASH_REFRESH_POLICY") {
            match policy.as_str() {
                "last_resolved" => self.dashboard.refresh_policy = RefreshPolicy::LastResolved,
                "latest_request" => self.dashboard.refresh_policy = RefreshPolicy::LatestRequest,
                other => tracing::warn!("Ignoring unknown refresh policy {:?}", other),
            }
        }

        if let Ok(level) = std::env::var("EXPENSE_DASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("EXPENSE_DASH_LOG_FORMAT") {
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
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Expense Dash Configuration
#
# Environment variables override these settings:
# - EXPENSE_DASH_API_URL
# - EXPENSE_DASH_TIMEOUT_SECS
# - EXPENSE_DASH_TOKEN_FILE
# - EXPENSE_DASH_REFRESH_POLICY
# - EXPENSE_DASH_LOG_LEVEL
# - EXPENSE_DASH_LOG_FORMAT

[api]
# Backend base URL
base_url = "http://localhost:8000"

# Request timeout in seconds (unset: wait indefinitely)
# request_timeout_secs = 30

[session]
# Where `expense-dash login` stores the session token
# token_file = "~/.local/share/expense-dash/session"

[dashboard]
# Pie chart slice limit when --head-top/--office-top are not given
default_top_n = 3

# How overlapping refreshes are applied:
# last_resolved (render every response as it arrives) or
# latest_request (drop responses superseded by a newer request)
refresh_policy = "last_resolved"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
