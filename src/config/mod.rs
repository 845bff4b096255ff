//! Configuration management

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Console settings: where the admin API lives and how long calls may take.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ConsoleConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request deadline; a call that exceeds it fails instead of hanging
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Persistent storage key holding the session token
    #[serde(default = "default_token_key")]
    pub token_key: String,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_token_key() -> String {
    "admin_session".to_string()
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            token_key: default_token_key(),
        }
    }
}

impl ConsoleConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Defaults, with the API base URL baked in at build time when
    /// `OSCODE_API_URL` was set. Used by the browser build.
    pub fn from_build_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = option_env!("OSCODE_API_URL") {
            if !url.is_empty() {
                config.api_base_url = url.to_string();
            }
        }
        config
    }

    /// Absolute URL for a server-relative path such as an uploaded image.
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}{}", self.api_base_url.trim_end_matches('/'), path)
    }
}

/// Settings for the in-repo mock admin API.
#[derive(Debug, Clone, Deserialize)]
pub struct MockServerConfig {
    #[serde(default = "default_mock_port")]
    pub port: u16,

    /// username -> password
    #[serde(default = "default_credentials")]
    pub credentials: HashMap<String, String>,

    /// Session lifetime
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

fn default_mock_port() -> u16 {
    8000
}

fn default_credentials() -> HashMap<String, String> {
    ["admin", "president", "vice_president"]
        .into_iter()
        .map(|user| (user.to_string(), "oscode2024".to_string()))
        .collect()
}

fn default_session_ttl_secs() -> u64 {
    3600
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            port: default_mock_port(),
            credentials: default_credentials(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

#[cfg(feature = "server")]
pub use native::{get_config_dir, load_config, load_mock_config};

#[cfg(feature = "server")]
mod native {
    use super::{ConsoleConfig, MockServerConfig};
    use anyhow::Result;
    use std::path::PathBuf;

    /// Platform config directory (falls back to the working directory).
    pub fn get_config_dir() -> PathBuf {
        directories::ProjectDirs::from("org", "oscode", "oscode-admin")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load console settings: defaults, then `oscode-admin.toml` in the config
    /// dir, then `OSCODE_ADMIN__*` environment variables.
    pub fn load_config() -> Result<ConsoleConfig> {
        let config = ::config::Config::builder()
            // Start with defaults
            .set_default("api_base_url", "http://localhost:8000")?
            .set_default("request_timeout_secs", 30)?
            .set_default("token_key", "admin_session")?
            // Load from config file if it exists
            .add_source(
                ::config::File::with_name(&get_config_dir().join("oscode-admin").to_string_lossy())
                    .required(false),
            )
            // Override with environment variables (OSCODE_ADMIN__API_BASE_URL, etc.)
            .add_source(
                ::config::Environment::with_prefix("OSCODE_ADMIN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Load mock API settings (`OSCODE_MOCK__PORT`, ...).
    pub fn load_mock_config() -> Result<MockServerConfig> {
        let config = ::config::Config::builder()
            .set_default("port", 8000)?
            .add_source(
                ::config::File::with_name(&get_config_dir().join("mock-admin-api").to_string_lossy())
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix("OSCODE_MOCK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
