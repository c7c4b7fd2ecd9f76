use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Unified error type for git-bump operations
#[derive(Error, Debug)]
pub enum GitBumpError {
    #[error("Invalid version format: {0}")]
    InvalidVersionFormat(String),

    #[error("Working tree has uncommitted changes")]
    DirtyWorkingTree,

    #[error("Branch rejected: {0}")]
    BranchRejected(String),

    #[error("Tests failed: {0}")]
    TestsFailed(String),

    #[error("No version file found: {0}")]
    NoVersionFileFound(String),

    #[error("Ambiguous version file, found {} candidates: {}", .0.len(), display_paths(.0))]
    AmbiguousVersionFile(Vec<PathBuf>),

    #[error("Failed to read version from {path}: {reason}")]
    VersionStoreReadError { path: PathBuf, reason: String },

    #[error("Failed to write version to {path}: {reason}")]
    VersionStoreWriteError { path: PathBuf, reason: String },

    #[error("{step} failed with exit code {code}\nStdout: {stdout}\nStderr: {stderr}")]
    ExternalCommandFailed {
        step: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("{step} timed out after {}s", .timeout.as_secs())]
    CommandTimedOut { step: String, timeout: Duration },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-bump
pub type Result<T> = std::result::Result<T, GitBumpError>;

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl GitBumpError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitBumpError::Config(msg.into())
    }

    /// Create a version format error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitBumpError::InvalidVersionFormat(msg.into())
    }

    pub fn read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        GitBumpError::VersionStoreReadError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        GitBumpError::VersionStoreWriteError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
