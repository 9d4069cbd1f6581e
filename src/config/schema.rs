//! Configuration schema for execbox
//!
//! Configuration is stored at `~/.config/execbox/config.toml`

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Execution service settings
    pub server: ServerConfig,

    /// Execution container settings
    pub container: ContainerConfig,
}

/// Execution service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Deployment origin serving `/.api/extension-containers/*`
    pub origin: String,

    /// Whole-request timeout in seconds (0 = no timeout)
    pub timeout_secs: u64,

    /// Hosts treated as open deployments whose archives come from the
    /// public archive host
    pub open_hosts: Vec<String>,

    /// Fail before sending a request whose archive URL needs a token
    pub strict_archive_resolution: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3080".to_string(),
            timeout_secs: 0,
            open_hosts: vec!["localhost".to_string()],
            strict_archive_resolution: false,
        }
    }
}

/// Execution container settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Container identity the requests target
    pub name: String,

    /// Files the container captures and returns after running commands
    pub include_files: Vec<String>,

    /// Coalesce identical requests within one client
    pub cache: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            name: "bundler".to_string(),
            include_files: vec![],
            cache: true,
        }
    }
}
