//! TOML configuration for discovery and the language server.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the optional configuration file looked up in the project root.
pub const CONFIG_FILE: &str = "spmtask.toml";

const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Configuration as defined in `spmtask.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Settings for the describe invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Upper bound for `swift package describe`, in milliseconds. Zero disables it.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Language server launch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_server_path")]
    pub path: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Exported to the server as `SOURCEKIT_TOOLCHAIN_PATH` when set.
    #[serde(default)]
    pub toolchain_path: Option<String>,
}

fn default_server_path() -> String {
    "sourcekit-lsp".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_server_path(),
            args: Vec::new(),
            toolchain_path: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `spmtask.toml` from `root`, falling back to defaults when it is absent.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let path = root.as_ref().join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|error| Error::Toml {
            error,
            context: path.display().to_string(),
        })
    }

    /// Returns the describe timeout, or `None` when disabled.
    pub fn describe_timeout(&self) -> Option<Duration> {
        match self.discovery.timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.discovery.timeout_ms = timeout_ms;
        self
    }

    pub fn with_server_enabled(mut self, enabled: bool) -> Self {
        self.server.enabled = enabled;
        self
    }

    pub fn with_server_path(mut self, path: impl Into<String>) -> Self {
        self.server.path = path.into();
        self
    }

    pub fn with_toolchain_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.server.toolchain_path = if path.is_empty() { None } else { Some(path) };
        self
    }
}
