//! Wire types exchanged with the execution service

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Repository and revision a batch of commands runs against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryContext {
    /// Opaque repository identifier (e.g. `github.com/acme/widgets`)
    pub repository: String,

    /// Content-addressed revision
    pub commit: String,

    /// Subdirectory to run in, relative to the repository root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl RepositoryContext {
    pub fn new(repository: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            commit: commit.into(),
            path: None,
        }
    }

    /// Scope the commands to a subdirectory
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// The `params` payload sent to an execution container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecRequest {
    #[serde(rename = "archiveURL")]
    archive_url: String,

    commands: Vec<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    dir: Option<String>,

    include_files: BTreeSet<String>,
}

impl ExecRequest {
    pub fn new(
        archive_url: String,
        dir: Option<String>,
        commands: Vec<Vec<String>>,
        include_files: BTreeSet<String>,
    ) -> Self {
        Self {
            archive_url,
            commands,
            dir,
            include_files,
        }
    }

    pub fn archive_url(&self) -> &str {
        &self.archive_url
    }

    pub fn dir(&self) -> Option<&str> {
        self.dir.as_deref()
    }

    pub fn commands(&self) -> &[Vec<String>] {
        &self.commands
    }

    pub fn include_files(&self) -> &BTreeSet<String> {
        &self.include_files
    }
}

/// Outcome of one command pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcome {
    /// Interleaved stdout and stderr
    pub combined_output: String,

    pub ok: bool,

    /// Why the command failed, when `ok` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body of an execution container
///
/// `commands[i]` is the outcome of the i-th submitted pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecResult {
    pub commands: Vec<CommandOutcome>,

    /// Captured files, keyed by path relative to the working directory
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

impl ExecResult {
    /// Whether every command succeeded
    pub fn all_ok(&self) -> bool {
        self.commands.iter().all(|c| c.ok)
    }

    /// Failed commands together with their submission index
    pub fn failed(&self) -> impl Iterator<Item = (usize, &CommandOutcome)> {
        self.commands.iter().enumerate().filter(|(_, c)| !c.ok)
    }

    /// Contents of a captured file
    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }
}
