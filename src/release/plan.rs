use std::fmt;
use std::path::PathBuf;

use crate::domain::{Version, VersionStyle};
use crate::git::GitCommand;

/// Mutating steps of a release, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReleaseStep {
    WriteVersion,
    Add,
    Commit,
    Tag,
    PushTag,
    PushBranch,
}

impl ReleaseStep {
    pub const ALL: [ReleaseStep; 6] = [
        ReleaseStep::WriteVersion,
        ReleaseStep::Add,
        ReleaseStep::Commit,
        ReleaseStep::Tag,
        ReleaseStep::PushTag,
        ReleaseStep::PushBranch,
    ];
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseStep::WriteVersion => "write version",
            ReleaseStep::Add => "add",
            ReleaseStep::Commit => "commit",
            ReleaseStep::Tag => "tag",
            ReleaseStep::PushTag => "push tag",
            ReleaseStep::PushBranch => "push branch",
        };
        f.write_str(name)
    }
}

/// Everything a release will do, computed before anything is mutated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub current: Version,
    pub next: Version,
    /// Version file, relative to the work tree root
    pub file: PathBuf,
    pub style: VersionStyle,
    pub remote: String,
    pub commit_message: String,
}

impl ReleasePlan {
    pub fn tag(&self) -> String {
        self.next.tag_name()
    }

    pub fn tag_message(&self) -> String {
        format!("Version {}", self.tag())
    }

    /// One human readable line per step, in execution order
    pub fn operations(&self) -> Vec<String> {
        ReleaseStep::ALL
            .iter()
            .map(|step| self.describe(*step))
            .collect()
    }

    pub fn describe(&self, step: ReleaseStep) -> String {
        let tag = self.tag();
        let tag_message = self.tag_message();
        match step {
            ReleaseStep::WriteVersion => format!(
                "Update {} from {} to {}",
                self.file.display(),
                self.current.format(self.style),
                self.next.format(self.style)
            ),
            ReleaseStep::Add => GitCommand::Add { path: self.file.as_path() }.display(),
            ReleaseStep::Commit => GitCommand::Commit { message: &self.commit_message }.display(),
            ReleaseStep::Tag => GitCommand::AnnotatedTag {
                name: &tag,
                message: &tag_message,
            }
            .display(),
            ReleaseStep::PushTag => GitCommand::PushTag {
                remote: &self.remote,
                tag: &tag,
            }
            .display(),
            ReleaseStep::PushBranch => GitCommand::Push.display(),
        }
    }

    /// Commands that undo the local git side effects of `completed` steps.
    ///
    /// The file itself is restored by rollback. Anything already pushed can
    /// only be withdrawn from the remote by hand, so the tag deletion refspec
    /// comes first when the tag push went through.
    pub fn remediation(&self, completed: &[ReleaseStep]) -> Vec<String> {
        let tag = self.tag();
        let mut commands = Vec::new();
        if completed.contains(&ReleaseStep::PushTag) {
            commands.push(format!("git push {} :refs/tags/{}", self.remote, tag));
        }
        if completed.contains(&ReleaseStep::Tag) {
            commands.push(format!("git tag -d {}", tag));
        }
        if completed.contains(&ReleaseStep::Commit) {
            commands.push("git reset --soft HEAD~1".to_string());
        }
        // the bumped file stays staged after a soft reset
        if completed.contains(&ReleaseStep::Add) {
            commands.push(format!("git restore --staged {}", self.file.display()));
        }
        commands
    }
}
