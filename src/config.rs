use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Base URL used when neither the CLI, the environment nor the config file name one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

const CONFIG_FILE: &str = ".profile-view.toml";
const BASE_URL_ENV: &str = "PROFILE_VIEW_BASE_URL";
const TOKEN_ENV: &str = "PROFILE_VIEW_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid backend base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Top-level configuration loaded from .profile-view.toml.
///
/// All fields are optional. The tool works with zero config against a local backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// Backend base URL, e.g. "https://backend.example".
    pub base_url: Option<String>,
    /// Optional bearer token sent with every request.
    pub token: Option<String>,
}

impl Config {
    /// Load configuration from .profile-view.toml in the current directory,
    /// then apply environment overrides.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Layer environment values over the file config. A non-blank
    /// PROFILE_VIEW_BASE_URL replaces the file's base URL; PROFILE_VIEW_TOKEN
    /// only fills in a token the file leaves unset.
    pub fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = get(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = Some(base_url);
        }
        if self.api.token.is_none() {
            self.api.token = get(TOKEN_ENV).filter(|t| !t.is_empty());
        }
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the backend base URL. An explicit override (the CLI flag) wins
    /// over the loaded value, which wins over [`DEFAULT_BASE_URL`].
    /// Trailing slashes are stripped.
    pub fn base_url(&self, cli_override: Option<&str>) -> Result<String, ConfigError> {
        let raw = cli_override
            .or(self.api.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL);

        let parsed =
            reqwest::Url::parse(raw).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
        }

        Ok(raw.trim_end_matches('/').to_string())
    }
}
