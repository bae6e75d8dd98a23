//! TOML-based client configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::cli::Args;

/// Default AEP service location.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
/// Default run endpoint path.
pub const DEFAULT_ENDPOINT: &str = "/api/aep/run";

/// Top-level client configuration parsed from TOML.
///
/// All sections have defaults, so an empty file is valid. Load with
/// [`ClientConfig::from_toml_file`] or start from [`ClientConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Where the run request is sent.
    #[serde(default)]
    pub server: ServerConfig,
    /// Terminal UI settings.
    #[serde(default)]
    pub ui: UiConfig,
    /// Distribution export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// AEP service location and request settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Scheme, host and port of the service (e.g. `http://127.0.0.1:8000`).
    pub base_url: String,
    /// Path of the run endpoint, starting with `/`.
    pub endpoint: String,
    /// Request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
        }
    }
}

impl ServerConfig {
    /// Joins base URL and endpoint without doubling the slash.
    pub fn run_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.endpoint)
    }
}

/// Terminal UI settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    /// Input poll interval in milliseconds (must be > 0).
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_ms: 100 }
    }
}

/// Distribution export settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// CSV destination used by `--export` and the TUI save key.
    pub path: Option<PathBuf>,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"server.base_url"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ClientConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Applies command-line overrides on top of file values.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref url) = args.base_url {
            self.server.base_url = url.clone();
        }
        if let Some(ref endpoint) = args.endpoint {
            self.server.endpoint = endpoint.clone();
        }
        if let Some(secs) = args.timeout {
            self.server.timeout_secs = Some(secs);
        }
        if let Some(ref path) = args.export {
            self.export.path = Some(path.clone());
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.server;

        match reqwest::Url::parse(&s.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ConfigError::new(
                "server.base_url",
                format!("scheme must be http or https, got \"{}\"", url.scheme()),
            )),
            Err(e) => errors.push(ConfigError::new(
                "server.base_url",
                format!("invalid URL \"{}\": {e}", s.base_url),
            )),
        }
        if !s.endpoint.starts_with('/') {
            errors.push(ConfigError::new("server.endpoint", "must start with '/'"));
        }
        if s.timeout_secs == Some(0) {
            errors.push(ConfigError::new("server.timeout_secs", "must be > 0 when set"));
        }
        if self.ui.tick_ms == 0 {
            errors.push(ConfigError::new("ui.tick_ms", "must be > 0"));
        }

        errors
    }
}
