//! HTTP transport abstraction
//!
//! The client only ever issues idempotent GETs, so the transport surface is
//! a single method. `UreqTransport` is the production implementation.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Content type sent with every execution request
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,

    /// Raw response body; empty for non-success statuses
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced an HTTP status
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Issues GET requests against the execution service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url`, returning any status the server produced
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError>;
}

/// Blocking `ureq` agent driven from tokio's blocking pool
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Create a transport; `timeout` bounds each whole request when set
    pub fn new(timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || {
            let mut response = agent
                .get(url.as_str())
                .header("Content-Type", CONTENT_TYPE)
                .call()
                .map_err(|e| TransportError(e.to_string()))?;

            // Captured files can be large; the body is read whole, and
            // decoding is left to the caller.
            let status = response.status();
            let body = if status.is_success() {
                response
                    .body_mut()
                    .with_config()
                    .limit(u64::MAX)
                    .read_to_vec()
                    .map_err(|e| TransportError(format!("reading response body: {}", e)))?
            } else {
                Vec::new()
            };

            Ok(HttpResponse {
                status: status.as_u16(),
                body,
            })
        })
        .await
        .map_err(|e| TransportError(format!("request task failed: {}", e)))?
    }
}
