use crate::error::{GitBumpError, Result};
use git2::Repository;
use std::path::{Path, PathBuf};

/// Locate the work tree root of the repository containing `path`
///
/// Walks up from `path` like git itself does. Bare repositories have no work
/// tree and are rejected.
pub fn discover_work_tree<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let repo = Repository::discover(path.as_ref())?;

    let workdir = repo.workdir().ok_or_else(|| {
        GitBumpError::config(format!(
            "repository at {} is bare; a work tree is required",
            repo.path().display()
        ))
    })?;

    tracing::debug!(work_tree = %workdir.display(), "discovered repository");
    Ok(workdir.to_path_buf())
}
