//! Configuration structures.
//!
//! Configuration comes from defaults, an optional JSON file, and CLI flags
//! (with environment fallbacks) layered on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::errors::{Error, Result};

/// Global interpreter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Assisted resolution backend.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Tool server launch settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Domain intercept settings.
    #[serde(default)]
    pub intercepts: InterceptConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load a JSON config file. Missing sections fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| Error::config(format!("invalid config {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.assistant.enabled {
            if self.assistant.endpoint.trim().is_empty() {
                return Err(Error::config("assistant.endpoint cannot be empty"));
            }
            if self.assistant.model.trim().is_empty() {
                return Err(Error::config("assistant.model cannot be empty"));
            }
            if self.assistant.timeout.is_zero() {
                return Err(Error::config("assistant.timeout must be positive"));
            }
        }
        if self.server.command.trim().is_empty() {
            return Err(Error::config("server.command cannot be empty"));
        }
        Ok(())
    }
}

/// Assisted resolution backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Skip the assisted step entirely when false.
    pub enabled: bool,

    /// Base URL of the chat completion service.
    pub endpoint: String,

    /// Model requested from the service.
    pub model: String,

    /// Upper bound on one assisted round trip.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://localhost:11434".to_string(),
            model: "qwen3:1.7b".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Tool server launch configuration (stdio transport).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Executable that serves MCP over stdio.
    pub command: String,

    /// Arguments passed to the executable.
    pub args: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            command: "python".to_string(),
            args: vec!["server.py".to_string()],
        }
    }
}

/// Domain intercept configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptConfig {
    /// Location used by the weather intercept when none is named.
    pub default_location: String,
}

impl Default for InterceptConfig {
    fn default() -> Self {
        Self {
            default_location: "Nashville".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
