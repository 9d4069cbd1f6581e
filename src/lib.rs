//! execbox - Sandboxed Execution Client
//!
//! Sends command pipelines to remote execution containers and coalesces
//! identical requests into a single round trip.

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod ui;

pub use client::{ClientOptions, ExecClient, ExecResult, RepositoryContext};
pub use error::{ExecError, ExecboxError, ExecboxResult};
