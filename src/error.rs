//! Error types for execbox
//!
//! `ExecError` covers a single execution call and is `Clone` so that one
//! failure can be handed to every caller coalesced onto the same request.
//! Everything else returns `ExecboxResult<T>`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for application-level operations
pub type ExecboxResult<T> = Result<T, ExecboxError>;

/// Failures of one request to the execution service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("error executing command in {repository}: HTTP {status}")]
    Transport { repository: String, status: u16 },

    #[error("error executing command in {repository}: {reason}")]
    Http { repository: String, reason: String },

    #[error("malformed response for {repository}: {reason}")]
    MalformedResponse { repository: String, reason: String },

    #[error("archive for {repository} is only reachable with an access token")]
    PrivateArchive { repository: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ExecError {
    /// Create a transport error from a non-success HTTP status
    pub fn transport(repository: impl Into<String>, status: u16) -> Self {
        Self::Transport {
            repository: repository.into(),
            status,
        }
    }

    /// Create an HTTP error for a request that never produced a status
    pub fn http(repository: impl Into<String>, reason: impl ToString) -> Self {
        Self::Http {
            repository: repository.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a parse failure for a response body
    pub fn malformed(repository: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedResponse {
            repository: repository.into(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// All errors that can occur in execbox
#[derive(Error, Debug)]
pub enum ExecboxError {
    #[error(transparent)]
    Exec(#[from] ExecError),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid server origin {origin}: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("Invalid command pipeline: {0}")]
    InvalidCommand(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    User(String),
}

impl ExecboxError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Check if error is retryable
    ///
    /// Only applies to a fresh client: a failed request stays cached for
    /// the lifetime of the client that issued it.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Exec(ExecError::Transport { status, .. }) => *status >= 500,
            Self::Exec(ExecError::Http { .. }) => true,
            _ => false,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Exec(ExecError::PrivateArchive { .. }) => Some(
                "Use a repository from the public alias table, or set server.strict_archive_resolution = false",
            ),
            Self::Exec(ExecError::Transport { status: 401 | 403, .. }) => {
                Some("The archive URL likely needs an access token the client does not send")
            }
            Self::Exec(ExecError::Http { .. }) => Some("Check server.origin in: execbox config show"),
            Self::InvalidOrigin { .. } => Some("Run: execbox config path, then fix server.origin"),
            _ => None,
        }
    }
}
