use crate::error::{GitBumpError, Result};
use crate::git::{GitCommand, VersionControl};
use std::cell::RefCell;
use std::path::Path;

/// Mock repository for testing without actual git operations
///
/// Every call is recorded as the command line the system backend would have
/// run. A step can be made to fail with [MockGit::fail_on].
pub struct MockGit {
    clean: bool,
    branch: String,
    fail_step: Option<&'static str>,
    calls: RefCell<Vec<String>>,
}

impl MockGit {
    /// Create a clean mock repository on `main`
    pub fn new() -> Self {
        MockGit {
            clean: true,
            branch: "main".to_string(),
            fail_step: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Report uncommitted changes
    pub fn dirty(mut self) -> Self {
        self.clean = false;
        self
    }

    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Fail the operation whose [GitCommand::step] equals `step`
    pub fn fail_on(mut self, step: &'static str) -> Self {
        self.fail_step = Some(step);
        self
    }

    /// Command lines recorded so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, cmd: GitCommand<'_>) -> Result<()> {
        self.calls.borrow_mut().push(cmd.display());
        if self.fail_step == Some(cmd.step()) {
            return Err(GitBumpError::ExternalCommandFailed {
                step: cmd.display(),
                code: 1,
                stdout: String::new(),
                stderr: format!("mock failure in {}", cmd.step()),
            });
        }
        Ok(())
    }
}

impl Default for MockGit {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for MockGit {
    fn is_clean(&self) -> Result<bool> {
        self.record(GitCommand::DiffIndexQuiet)?;
        Ok(self.clean)
    }

    fn current_branch(&self) -> Result<String> {
        self.record(GitCommand::ShowCurrentBranch)?;
        Ok(self.branch.clone())
    }

    fn add(&self, path: &Path) -> Result<()> {
        self.record(GitCommand::Add { path })
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.record(GitCommand::Commit { message })
    }

    fn tag(&self, name: &str, message: &str) -> Result<()> {
        self.record(GitCommand::AnnotatedTag { name, message })
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.record(GitCommand::PushTag { remote, tag })
    }

    fn push_branch(&self) -> Result<()> {
        self.record(GitCommand::Push)
    }
}
