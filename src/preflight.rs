//! Checks run before anything is modified
//!
//! Order is fixed and cheapest first: clean tree, branch, tests. The first
//! failing check stops the run.

use std::path::Path;

use crate::config::Settings;
use crate::domain::BranchContext;
use crate::error::{GitBumpError, Result};
use crate::git::VersionControl;
use crate::process::ProcessCommand;
use crate::ui::{self, Prompter};
use crate::warning::ReleaseWarning;

pub struct Preflight<'a, G: ?Sized, P: ?Sized> {
    git: &'a G,
    prompter: &'a P,
    settings: &'a Settings,
    work_tree: &'a Path,
}

impl<'a, G, P> Preflight<'a, G, P>
where
    G: VersionControl + ?Sized,
    P: Prompter + ?Sized,
{
    pub fn new(git: &'a G, prompter: &'a P, settings: &'a Settings, work_tree: &'a Path) -> Self {
        Preflight {
            git,
            prompter,
            settings,
            work_tree,
        }
    }

    /// Refuse to release with uncommitted changes, which the release commit
    /// would otherwise pick up.
    pub fn check_clean_tree(&self) -> Result<()> {
        ui::display_status("Checking working tree...");
        if !self.git.is_clean()? {
            return Err(GitBumpError::DirtyWorkingTree);
        }
        ui::display_success("Working tree is clean");
        Ok(())
    }

    /// Require an accepted release branch, or an explicit override from the user.
    pub fn check_branch(&self) -> Result<()> {
        ui::display_status("Checking current branch...");
        let name = self.git.current_branch().map_err(|e| {
            GitBumpError::BranchRejected(format!("could not determine current branch: {}", e))
        })?;
        let branch = BranchContext::new(name, self.settings.release_branches.as_slice());

        if branch.is_release_branch() {
            ui::display_success(&format!("On release branch '{}'", branch.name));
            return Ok(());
        }

        let warning = if branch.is_detached() {
            ReleaseWarning::DetachedHead
        } else {
            ReleaseWarning::NonReleaseBranch {
                branch: branch.name.clone(),
                accepted: self.settings.release_branches.clone(),
            }
        };
        ui::display_warning(&warning);
        tracing::debug!(branch = %branch.name, "not a release branch");

        if self.prompter.confirm("Continue anyway?")? {
            Ok(())
        } else {
            Err(GitBumpError::BranchRejected(warning.to_string()))
        }
    }

    /// Run the configured test command; output is shown only when it fails.
    pub fn run_tests(&self, skip: bool) -> Result<()> {
        if skip {
            ui::display_warning(&ReleaseWarning::TestsSkipped);
            return Ok(());
        }

        let (program, args) = self
            .settings
            .tests
            .command
            .split_first()
            .ok_or_else(|| GitBumpError::config("tests.command must name a program"))?;
        let cmd = ProcessCommand::new(program)
            .args(args)
            .current_dir(self.work_tree)
            .timeout(self.settings.timeouts.tests());

        ui::display_status(&format!("Running tests: {}", cmd.display()));
        let output = cmd.output().map_err(|e| {
            GitBumpError::TestsFailed(format!("could not run {}: {}", cmd.display(), e))
        })?;

        if !output.success() {
            ui::display_command_output(&output);
            tracing::debug!(command = %cmd.display(), code = ?output.code, "tests failed");
            return Err(GitBumpError::TestsFailed(format!(
                "{} exited with code {}",
                cmd.display(),
                output.code.map_or_else(|| "none".to_string(), |c| c.to_string())
            )));
        }

        ui::display_success("Tests passed");
        Ok(())
    }

    /// All checks in order, stopping at the first failure.
    pub fn run_preflight(&self, skip_tests: bool) -> Result<()> {
        self.check_clean_tree()?;
        self.check_branch()?;
        self.run_tests(skip_tests)
    }
}
