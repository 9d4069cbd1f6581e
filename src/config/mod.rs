//! Configuration file handling
//!
//! The file lives at `<config_dir>/execbox/config.toml` unless `--config`
//! (or `EXECBOX_CONFIG`) names another one. A missing file is not an
//! error: every section has serde defaults.

pub mod schema;

pub use schema::Config;

use crate::error::{ExecboxError, ExecboxResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Reads and writes the config file at one resolved location
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Use `explicit` when given, otherwise the per-user default location
    pub fn locate(explicit: Option<PathBuf>) -> Self {
        let path = explicit.unwrap_or_else(Self::default_config_path);
        debug!("Using config file {}", path.display());
        Self { path }
    }

    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.extend(["execbox", "config.toml"]);
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a config file is present at the resolved location
    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Read the config file, or the defaults when there is none
    pub async fn load(&self) -> ExecboxResult<Config> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => parse(&self.path, &text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", self.path.display());
                Ok(Config::default())
            }
            Err(e) => Err(ExecboxError::io(
                format!("reading config from {}", self.path.display()),
                e,
            )),
        }
    }

    /// Write `config`, creating the parent directory if needed.
    ///
    /// The file is written next to its destination first and renamed into
    /// place, so a reader never sees half a config.
    pub async fn save(&self, config: &Config) -> ExecboxResult<()> {
        let text = toml::to_string_pretty(config)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|source| ExecboxError::ConfigDirCreate {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        let staging = self.path.with_extension("toml.tmp");
        let write_err =
            |e| ExecboxError::io(format!("writing config to {}", self.path.display()), e);
        fs::write(&staging, text).await.map_err(write_err)?;
        fs::rename(&staging, &self.path).await.map_err(write_err)?;

        info!("Configuration saved to {}", self.path.display());
        Ok(())
    }
}

fn parse(path: &Path, text: &str) -> ExecboxResult<Config> {
    toml::from_str(text).map_err(|e| ExecboxError::ConfigInvalid {
        path: path.to_path_buf(),
        reason: e.message().to_string(),
    })
}
