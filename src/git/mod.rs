//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations a
//! release needs, allowing for a real implementation that shells out to the
//! system `git` binary and a mock implementation for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [VersionControl] trait. The concrete
//! implementations include:
//!
//! - [system::SystemGit]: runs [GitCommand]s against a work tree
//! - [mock::MockGit]: records operations and fails on request
//!
//! Repository discovery uses `git2` (see [repository::discover_work_tree]).

pub mod command;
pub mod mock;
pub mod repository;
pub mod system;

pub use command::GitCommand;
pub use mock::MockGit;
pub use repository::discover_work_tree;
pub use system::SystemGit;

use crate::error::Result;
use std::path::Path;

/// Common git operation trait for abstraction
///
/// ## Error Handling
///
/// Query methods report git's answer as a value. Mutating methods return
/// [crate::error::GitBumpError::ExternalCommandFailed] with the captured
/// output when git exits non-zero.
pub trait VersionControl {
    /// True when there are no uncommitted changes relative to HEAD
    fn is_clean(&self) -> Result<bool>;

    /// Name of the checked-out branch; empty for a detached HEAD
    fn current_branch(&self) -> Result<String>;

    /// Stage a file, path relative to the work tree root
    fn add(&self, path: &Path) -> Result<()>;

    fn commit(&self, message: &str) -> Result<()>;

    /// Create an annotated tag at HEAD
    fn tag(&self, name: &str, message: &str) -> Result<()>;

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()>;

    /// Push the current branch to its upstream
    fn push_branch(&self) -> Result<()>;
}
