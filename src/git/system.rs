use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::git::{GitCommand, VersionControl};
use crate::process::CommandOutput;

/// Git backend using the system `git` binary
pub struct SystemGit {
    work_tree: PathBuf,
    push_timeout: Option<Duration>,
}

impl SystemGit {
    /// Run git commands from `work_tree`
    pub fn new(work_tree: impl Into<PathBuf>) -> Self {
        SystemGit {
            work_tree: work_tree.into(),
            push_timeout: None,
        }
    }

    /// Bound the duration of `git push` invocations
    pub fn with_push_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.push_timeout = timeout;
        self
    }

    fn run(&self, cmd: GitCommand<'_>) -> Result<CommandOutput> {
        let timeout = if cmd.is_push() { self.push_timeout } else { None };
        cmd.to_process()
            .current_dir(&self.work_tree)
            .timeout(timeout)
            .output()
    }

    fn run_checked(&self, cmd: GitCommand<'_>) -> Result<()> {
        let output = self.run(cmd)?;
        if !output.success() {
            tracing::debug!(
                command = %cmd.display(),
                code = ?output.code,
                stdout = %output.stdout.trim(),
                stderr = %output.stderr.trim(),
                "git command failed"
            );
        }
        output.into_result(&cmd.display())?;
        Ok(())
    }
}

impl VersionControl for SystemGit {
    fn is_clean(&self) -> Result<bool> {
        let output = self.run(GitCommand::DiffIndexQuiet)?;
        match output.code {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            // 128 and friends: no HEAD, not a repository, ...
            _ => output
                .into_result(&GitCommand::DiffIndexQuiet.display())
                .map(|_| false),
        }
    }

    fn current_branch(&self) -> Result<String> {
        let cmd = GitCommand::ShowCurrentBranch;
        let output = self.run(cmd)?.into_result(&cmd.display())?;
        Ok(output.stdout.trim().to_string())
    }

    fn add(&self, path: &Path) -> Result<()> {
        self.run_checked(GitCommand::Add { path })
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.run_checked(GitCommand::Commit { message })
    }

    fn tag(&self, name: &str, message: &str) -> Result<()> {
        self.run_checked(GitCommand::AnnotatedTag { name, message })
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.run_checked(GitCommand::PushTag { remote, tag })
    }

    fn push_branch(&self) -> Result<()> {
        self.run_checked(GitCommand::Push)
    }
}
