//! Client for sandboxed execution containers
//!
//! A container runs argv-style command pipelines against a repository
//! archive it fetches itself, then returns per-command outcomes plus any
//! captured files:
//!
//! ```text
//! GET <origin>/.api/extension-containers/<container>?params=<json>
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use execbox::client::{ClientOptions, ExecClient, RepositoryContext};
//!
//! let options = ClientOptions::new(origin, "bundler").with_include_files(["Gemfile.lock"]);
//! let client = ExecClient::new(options)?;
//!
//! let result = client
//!     .execute(
//!         vec![vec!["bundle".into(), "lock".into()]],
//!         RepositoryContext::new("DEV/devise", commit),
//!     )
//!     .await?;
//! ```

pub mod archive;
mod exec;
mod options;
pub mod transport;
mod types;

pub use archive::ArchiveUrl;
pub use exec::ExecClient;
pub use options::{parse_origin, ClientOptions};
pub use transport::{HttpResponse, Transport, TransportError, UreqTransport};
pub use types::{CommandOutcome, ExecRequest, ExecResult, RepositoryContext};
