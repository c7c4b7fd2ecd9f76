use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met during a release.
/// These are reported to the user but do not by themselves stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// The checked-out branch is not one of the accepted release branches
    NonReleaseBranch {
        branch: String,
        accepted: Vec<String>,
    },
    /// HEAD does not point at a branch
    DetachedHead,
    /// The test suite was skipped on request
    TestsSkipped,
    /// Restoring the version file failed after a release step failed
    RollbackFailed { path: PathBuf, reason: String },
    /// The tag reached the remote before a later step failed
    TagAlreadyPushed { remote: String, tag: String },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::NonReleaseBranch { branch, accepted } => write!(
                f,
                "Not on a release branch ({}): currently on '{}'",
                accepted.join("/"),
                branch
            ),
            ReleaseWarning::DetachedHead => write!(f, "HEAD is detached, not on any branch"),
            ReleaseWarning::TestsSkipped => write!(f, "Skipping tests (--skip-tests)"),
            ReleaseWarning::RollbackFailed { path, reason } => write!(
                f,
                "Could not restore {}: {}. Please check the file manually",
                path.display(),
                reason
            ),
            ReleaseWarning::TagAlreadyPushed { remote, tag } => write!(
                f,
                "Tag '{}' was already pushed to '{}' and cannot be withdrawn automatically",
                tag, remote
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_release_branch_display() {
        let warning = ReleaseWarning::NonReleaseBranch {
            branch: "feature/login".to_string(),
            accepted: vec!["main".to_string(), "master".to_string()],
        };
        let msg = warning.to_string();
        assert!(msg.contains("main/master"), "got: {}", msg);
        assert!(msg.contains("feature/login"), "got: {}", msg);
    }

    #[test]
    fn test_rollback_failed_display() {
        let warning = ReleaseWarning::RollbackFailed {
            path: PathBuf::from("pyproject.toml"),
            reason: "permission denied".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("pyproject.toml"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_tag_already_pushed_display() {
        let warning = ReleaseWarning::TagAlreadyPushed {
            remote: "origin".to_string(),
            tag: "v1.2.4".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "Tag 'v1.2.4' was already pushed to 'origin' and cannot be withdrawn automatically"
        );
    }
}
