use crate::error::GitBumpError;
use crate::git::VersionControl;
use crate::release::plan::{ReleasePlan, ReleaseStep};
use crate::store::{VersionRecord, VersionStore};
use crate::ui;
use crate::warning::ReleaseWarning;

/// A release step failed. The version file has been rolled back (or the
/// attempt to do so failed); git side effects are listed in `remediation`.
#[derive(Debug)]
pub struct ReleaseFailure {
    pub step: ReleaseStep,
    pub error: GitBumpError,
    pub completed: Vec<ReleaseStep>,
    pub rollback_error: Option<GitBumpError>,
    pub remediation: Vec<String>,
}

impl ReleaseFailure {
    /// Print where the release stopped, the rollback outcome and the manual
    /// remediation. The error itself is left to the caller to report.
    pub fn report(&self, plan: &ReleasePlan, record: &VersionRecord) {
        ui::display_status(&format!("Release stopped at step '{}'", self.step));
        match &self.rollback_error {
            None => ui::display_success(&format!("Restored {}", plan.file.display())),
            Some(e) => ui::display_warning(&ReleaseWarning::RollbackFailed {
                path: record.path.clone(),
                reason: e.to_string(),
            }),
        }
        if self.completed.contains(&ReleaseStep::PushTag) {
            ui::display_warning(&ReleaseWarning::TagAlreadyPushed {
                remote: plan.remote.clone(),
                tag: plan.tag(),
            });
        }
        ui::display_remediation(&self.remediation);
    }
}

impl From<ReleaseFailure> for GitBumpError {
    fn from(failure: ReleaseFailure) -> Self {
        failure.error
    }
}

/// Applies a [ReleasePlan]: write the version, then add, commit, tag and push.
///
/// Steps run strictly in order. The first failure stops the run and restores
/// the version file from the record's snapshot.
pub struct ReleaseExecutor<'a, G: ?Sized, S: ?Sized> {
    git: &'a G,
    store: &'a S,
}

impl<'a, G, S> ReleaseExecutor<'a, G, S>
where
    G: VersionControl + ?Sized,
    S: VersionStore + ?Sized,
{
    pub fn new(git: &'a G, store: &'a S) -> Self {
        ReleaseExecutor { git, store }
    }

    fn run_step(
        &self,
        step: ReleaseStep,
        record: &VersionRecord,
        plan: &ReleasePlan,
    ) -> crate::error::Result<()> {
        ui::display_status(&plan.describe(step));
        match step {
            ReleaseStep::WriteVersion => self.store.write(record, &plan.next),
            ReleaseStep::Add => self.git.add(&plan.file),
            ReleaseStep::Commit => self.git.commit(&plan.commit_message),
            ReleaseStep::Tag => self.git.tag(&plan.tag(), &plan.tag_message()),
            ReleaseStep::PushTag => self.git.push_tag(&plan.remote, &plan.tag()),
            ReleaseStep::PushBranch => self.git.push_branch(),
        }
    }

    pub fn execute(
        &self,
        record: &VersionRecord,
        plan: &ReleasePlan,
    ) -> Result<(), ReleaseFailure> {
        let mut completed = Vec::with_capacity(ReleaseStep::ALL.len());

        for step in ReleaseStep::ALL {
            if let Err(error) = self.run_step(step, record, plan) {
                tracing::debug!(%step, %error, "release step failed");
                let rollback_error = self.store.rollback(record).err();
                if let Some(e) = &rollback_error {
                    tracing::debug!(error = %e, "rollback failed");
                }
                return Err(ReleaseFailure {
                    step,
                    error,
                    remediation: plan.remediation(&completed),
                    completed,
                    rollback_error,
                });
            }
            tracing::info!(%step, "done");
            completed.push(step);
        }

        Ok(())
    }
}
