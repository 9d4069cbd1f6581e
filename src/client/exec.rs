//! Execution request client
//!
//! `ExecClient::execute` resolves the repository archive, sends one GET to
//! the container endpoint and parses the result. With caching enabled,
//! identical `(commands, context)` pairs share a single request for the
//! lifetime of the client.

use crate::cache::Memoized;
use crate::client::archive::{self, ArchiveUrl};
use crate::client::options::ClientOptions;
use crate::client::transport::{Transport, UreqTransport};
use crate::client::types::{ExecRequest, ExecResult, RepositoryContext};
use crate::error::{ExecError, ExecboxError, ExecboxResult};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// One logical call; its JSON form is the cache key
#[derive(Debug, Clone, Serialize)]
struct Invocation {
    commands: Vec<Vec<String>>,
    context: RepositoryContext,
}

fn invocation_key(invocation: &Invocation) -> String {
    // Field order is fixed by the struct, so equal invocations give equal keys.
    serde_json::to_string(invocation).unwrap_or_else(|_| format!("{:?}", invocation))
}

/// Uncached request path shared by every caller of a client
struct Executor {
    endpoint: Url,
    origin: Url,
    open_hosts: Vec<String>,
    strict_archive_resolution: bool,
    include_files: BTreeSet<String>,
    transport: Arc<dyn Transport>,
}

impl Executor {
    fn resolve_archive(&self, context: &RepositoryContext) -> Result<ArchiveUrl, ExecError> {
        let archive = archive::resolve(
            &self.origin,
            &self.open_hosts,
            &context.repository,
            &context.commit,
        );

        if !archive.public {
            if self.strict_archive_resolution {
                return Err(ExecError::PrivateArchive {
                    repository: context.repository.clone(),
                });
            }
            warn!(
                "Archive for {} is served by the deployment and needs an access token",
                context.repository
            );
        }

        Ok(archive)
    }

    fn request_url(&self, request: &ExecRequest) -> Result<Url, ExecError> {
        let params = serde_json::to_string(request)
            .map_err(|e| ExecError::InvalidRequest(e.to_string()))?;
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("params", &params);
        Ok(url)
    }

    async fn run(&self, invocation: Invocation) -> Result<ExecResult, ExecError> {
        let Invocation { commands, context } = invocation;
        let repository = context.repository.as_str();

        if let Some(index) = commands.iter().position(Vec::is_empty) {
            return Err(ExecError::InvalidRequest(format!(
                "command {} in {} has no arguments",
                index + 1,
                repository
            )));
        }

        let archive = self.resolve_archive(&context)?;
        let submitted = commands.len();
        let request = ExecRequest::new(
            archive.url,
            context.path.clone(),
            commands,
            self.include_files.clone(),
        );
        let url = self.request_url(&request)?;

        debug!(
            "Executing {} command(s) in {}@{} via {}",
            submitted,
            repository,
            context.commit,
            self.endpoint
        );

        let response = self
            .transport
            .get(&url)
            .await
            .map_err(|e| ExecError::http(repository, e))?;

        if !response.is_success() {
            return Err(ExecError::transport(repository, response.status));
        }

        let result: ExecResult = serde_json::from_slice(&response.body)
            .map_err(|e| ExecError::malformed(repository, e))?;

        if result.commands.len() != submitted {
            warn!(
                "Execution service returned {} outcome(s) for {} command(s) in {}",
                result.commands.len(),
                submitted,
                repository
            );
        }

        Ok(result)
    }
}

/// Client for one execution container
pub struct ExecClient {
    executor: Arc<Executor>,
    memo: Option<Memoized<Invocation, ExecResult, ExecError>>,
}

impl ExecClient {
    /// Create a client that talks HTTP through `ureq`
    pub fn new(options: ClientOptions) -> ExecboxResult<Self> {
        let transport = UreqTransport::new(options.timeout);
        Self::with_transport(options, Arc::new(transport))
    }

    /// Create a client over a custom transport
    pub fn with_transport(
        options: ClientOptions,
        transport: Arc<dyn Transport>,
    ) -> ExecboxResult<Self> {
        let endpoint = container_endpoint(&options.origin, &options.container)?;
        debug!(
            "Execution client for {} (cache {})",
            endpoint,
            if options.cache { "on" } else { "off" }
        );

        let executor = Arc::new(Executor {
            endpoint,
            origin: options.origin,
            open_hosts: options.open_hosts,
            strict_archive_resolution: options.strict_archive_resolution,
            include_files: options.include_files,
            transport,
        });

        let memo = options.cache.then(|| {
            let executor = Arc::clone(&executor);
            Memoized::new(
                move |invocation: Invocation| {
                    let executor = Arc::clone(&executor);
                    async move { executor.run(invocation).await }
                },
                invocation_key,
            )
        });

        Ok(Self { executor, memo })
    }

    /// Run `commands` against the repository described by `context`.
    ///
    /// Each entry of `commands` is one argv-style pipeline. Outcomes come
    /// back in submission order; a failed command is reported in its
    /// outcome, not as an error.
    pub async fn execute(
        &self,
        commands: Vec<Vec<String>>,
        context: RepositoryContext,
    ) -> Result<ExecResult, ExecError> {
        let invocation = Invocation { commands, context };
        match &self.memo {
            Some(memo) => memo.call(invocation).await,
            None => self.executor.run(invocation).await,
        }
    }

    /// The container endpoint every request targets
    pub fn endpoint(&self) -> &Url {
        &self.executor.endpoint
    }

    /// Archive URL the service would fetch for `context`
    pub fn archive_url(&self, context: &RepositoryContext) -> Result<ArchiveUrl, ExecError> {
        self.executor.resolve_archive(context)
    }

    /// Distinct invocations remembered by the cache (0 when caching is off)
    pub fn cached_invocations(&self) -> usize {
        self.memo.as_ref().map_or(0, Memoized::len)
    }
}

/// `<origin>/.api/extension-containers/<container>`, dropping any path,
/// query or fragment on the origin
fn container_endpoint(origin: &Url, container: &str) -> ExecboxResult<Url> {
    if container.trim().is_empty() {
        return Err(ExecboxError::User(
            "Container name must not be empty".to_string(),
        ));
    }

    let mut url = origin.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| ExecboxError::InvalidOrigin {
            origin: origin.to_string(),
            reason: "origin cannot carry a path".to_string(),
        })?
        .clear()
        .extend([".api", "extension-containers", container]);

    Ok(url)
}
