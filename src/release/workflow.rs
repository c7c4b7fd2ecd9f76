//! Main release workflow orchestration
//!
//! Sequences preflight, version read, dry-run or confirmation, and the
//! executor. It takes a [ReleaseConfig] value rather than CLI types so the
//! workflow can be driven programmatically and from tests.

use std::path::Path;

use crate::config::Settings;
use crate::domain::{BumpKind, Version};
use crate::error::Result;
use crate::git::VersionControl;
use crate::preflight::Preflight;
use crate::release::executor::ReleaseExecutor;
use crate::release::plan::ReleasePlan;
use crate::store::{open_store, VersionStore};
use crate::ui::{self, Prompter};

/// What the user asked for, derived once from the invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseConfig {
    pub bump_kind: BumpKind,

    /// Report what would happen without changing anything
    pub dry_run: bool,

    /// Do not run the test suite during preflight
    pub skip_tests: bool,

    /// Skip confirmation and commit message prompts
    pub auto_confirm: bool,
}

/// How a release run ended without error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Version written, committed, tagged and pushed
    Released { previous: Version, version: Version },
    /// Nothing was changed; `version` is what would have been released
    DryRun { previous: Version, version: Version },
    /// The user declined at the confirmation prompt
    Cancelled,
}

/// One release run against a work tree
pub struct Release<'a, G: ?Sized, P: ?Sized> {
    pub config: ReleaseConfig,
    pub settings: &'a Settings,
    pub git: &'a G,
    pub prompter: &'a P,
    pub work_tree: &'a Path,
}

impl<'a, G, P> Release<'a, G, P>
where
    G: VersionControl + ?Sized,
    P: Prompter + ?Sized,
{
    /// Run the release, opening the version store from settings
    pub fn run(&self) -> Result<Outcome> {
        self.preflight()?;
        let store = open_store(self.work_tree, &self.settings.store, self.settings.store.kind)?;
        self.run_with_store(&store)
    }

    /// Run the release against an already opened store, skipping preflight
    ///
    /// [Release::run] is the entry point that includes preflight.
    pub fn run_with_store<S: VersionStore + ?Sized>(&self, store: &S) -> Result<Outcome> {
        let (record, current) = store.read()?;
        let next = current.checked_bump(self.config.bump_kind)?;
        ui::display_status(&format!(
            "Current version: {} ({})",
            record.raw,
            store.relative_path().display()
        ));
        ui::display_status(&format!("New version: {}", next.tag_name()));

        let mut plan = ReleasePlan {
            current,
            next,
            file: store.relative_path().to_path_buf(),
            style: store.style(),
            remote: self.settings.remote.clone(),
            commit_message: ui::default_commit_message(&next.tag_name()),
        };

        if self.config.dry_run {
            ui::display_dry_run_summary(&plan.tag(), &plan.operations());
            return Ok(Outcome::DryRun {
                previous: current,
                version: next,
            });
        }

        if !self.config.auto_confirm {
            ui::display_plan(&plan.current.tag_name(), &plan.tag(), &plan.operations());
            if !self.prompter.confirm("Continue?")? {
                ui::display_status("Release cancelled");
                return Ok(Outcome::Cancelled);
            }
        }

        plan.commit_message =
            ui::prompt_commit_message(self.prompter, &plan.tag(), self.config.auto_confirm)?;

        ReleaseExecutor::new(self.git, store)
            .execute(&record, &plan)
            .map_err(|failure| {
                failure.report(&plan, &record);
                failure
            })?;

        ui::display_success(&format!("Released {}", plan.tag()));
        Ok(Outcome::Released {
            previous: current,
            version: next,
        })
    }

    fn preflight(&self) -> Result<()> {
        if self.config.dry_run {
            ui::display_status("Dry run: no changes will be made");
        }
        Preflight::new(self.git, self.prompter, self.settings, self.work_tree)
            .run_preflight(self.config.skip_tests)
    }
}
