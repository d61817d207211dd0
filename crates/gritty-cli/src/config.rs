//! Client configuration at `~/.gritty/config.toml`.
//!
//! Provides default origin, namespace prefix, socket path, and environment
//! settings. CLI flags always override config file values.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level config file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default connection settings.
    #[serde(default)]
    pub default: DefaultConfig,
}

/// Default connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultConfig {
    /// Default server origin (empty = none), e.g. `http://localhost:1337`.
    #[serde(default)]
    pub host: String,

    /// Server namespace prefix.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Transport mount sub-path.
    #[serde(default)]
    pub socket_path: String,

    /// Environment passed to the remote shell.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Default for DefaultConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            prefix: default_prefix(),
            socket_path: String::new(),
            env: HashMap::new(),
        }
    }
}

fn default_prefix() -> String {
    "/gritty".to_string()
}

impl Config {
    /// Load configuration from a TOML file, returning defaults if the file
    /// does not exist.
    pub fn load(path: &str) -> Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

/// Parse a `KEY=VALUE` environment pair.
pub fn parse_env_pair(pair: &str) -> Result<(String, String)> {
    let Some(eq) = pair.find('=') else {
        anyhow::bail!("invalid env pair '{pair}' (expected KEY=VALUE)");
    };
    let key = &pair[..eq];
    if key.is_empty() {
        anyhow::bail!("empty key in env pair '{pair}'");
    }
    Ok((key.to_string(), pair[eq + 1..].to_string()))
}
