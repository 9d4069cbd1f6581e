//! Construction-time client settings

use crate::config::Config;
use crate::error::{ExecboxError, ExecboxResult};
use std::collections::BTreeSet;
use std::time::Duration;
use url::Url;

/// Settings fixed for the lifetime of an `ExecClient`
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Deployment origin serving the container endpoints
    pub origin: Url,

    /// Execution container identity
    pub container: String,

    /// Files captured after every request
    pub include_files: BTreeSet<String>,

    /// Coalesce identical requests
    pub cache: bool,

    /// Whole-request timeout applied by the HTTP transport
    pub timeout: Option<Duration>,

    /// Hosts whose repositories are served by the public archive host
    pub open_hosts: Vec<String>,

    /// Refuse requests whose archive URL would need a token
    pub strict_archive_resolution: bool,
}

impl ClientOptions {
    /// Options with caching on, no captured files and no timeout
    pub fn new(origin: Url, container: impl Into<String>) -> Self {
        Self {
            origin,
            container: container.into(),
            include_files: BTreeSet::new(),
            cache: true,
            timeout: None,
            open_hosts: vec!["localhost".to_string()],
            strict_archive_resolution: false,
        }
    }

    /// Build options from a loaded configuration
    pub fn from_config(config: &Config) -> ExecboxResult<Self> {
        let origin = parse_origin(&config.server.origin)?;
        let timeout = match config.server.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(Self {
            origin,
            container: config.container.name.clone(),
            include_files: config.container.include_files.iter().cloned().collect(),
            cache: config.container.cache,
            timeout,
            open_hosts: config.server.open_hosts.clone(),
            strict_archive_resolution: config.server.strict_archive_resolution,
        })
    }

    pub fn with_include_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_open_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.open_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strict_archive_resolution(mut self, strict: bool) -> Self {
        self.strict_archive_resolution = strict;
        self
    }
}

/// Parse and validate a deployment origin
pub fn parse_origin(origin: &str) -> ExecboxResult<Url> {
    let url = Url::parse(origin).map_err(|e| ExecboxError::InvalidOrigin {
        origin: origin.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ExecboxError::InvalidOrigin {
            origin: origin.to_string(),
            reason: "expected an http(s) URL with a host".to_string(),
        });
    }

    Ok(url)
}
