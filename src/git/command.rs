use std::ffi::OsString;
use std::path::Path;

use crate::process::ProcessCommand;

/// Typed git invocations used by the release pipeline.
///
/// Arguments are passed to git as separate argv entries, so commit messages
/// and tag names never go through a shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitCommand<'a> {
    /// `git diff-index --quiet HEAD --`
    DiffIndexQuiet,
    /// `git branch --show-current`
    ShowCurrentBranch,
    /// `git add <path>`
    Add { path: &'a Path },
    /// `git commit -m <message>`
    Commit { message: &'a str },
    /// `git tag -a <name> -m <message>`
    AnnotatedTag { name: &'a str, message: &'a str },
    /// `git push <remote> <tag>`
    PushTag { remote: &'a str, tag: &'a str },
    /// `git push`
    Push,
}

impl<'a> GitCommand<'a> {
    pub fn args(&self) -> Vec<OsString> {
        match *self {
            GitCommand::DiffIndexQuiet => os(["diff-index", "--quiet", "HEAD", "--"]),
            GitCommand::ShowCurrentBranch => os(["branch", "--show-current"]),
            GitCommand::Add { path } => vec!["add".into(), path.as_os_str().to_owned()],
            GitCommand::Commit { message } => os(["commit", "-m", message]),
            GitCommand::AnnotatedTag { name, message } => os(["tag", "-a", name, "-m", message]),
            GitCommand::PushTag { remote, tag } => os(["push", remote, tag]),
            GitCommand::Push => os(["push"]),
        }
    }

    /// Short name of the step, used in error reports
    pub fn step(&self) -> &'static str {
        match self {
            GitCommand::DiffIndexQuiet => "status",
            GitCommand::ShowCurrentBranch => "branch",
            GitCommand::Add { .. } => "add",
            GitCommand::Commit { .. } => "commit",
            GitCommand::AnnotatedTag { .. } => "tag",
            GitCommand::PushTag { .. } => "push tag",
            GitCommand::Push => "push branch",
        }
    }

    /// Pushes talk to the network and are subject to the push timeout
    pub fn is_push(&self) -> bool {
        matches!(self, GitCommand::PushTag { .. } | GitCommand::Push)
    }

    pub fn to_process(&self) -> ProcessCommand {
        ProcessCommand::new("git").args(self.args())
    }

    /// Shell-like rendering for logs and remediation hints
    pub fn display(&self) -> String {
        let mut parts = vec!["git".to_string()];
        for arg in self.args() {
            let arg = arg.to_string_lossy().into_owned();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                parts.push(format!("'{}'", arg.replace('\'', "'\\''")));
            } else {
                parts.push(arg);
            }
        }
        parts.join(" ")
    }
}

fn os<const N: usize>(args: [&str; N]) -> Vec<OsString> {
    args.into_iter().map(OsString::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_subcommands() {
        assert_eq!(GitCommand::DiffIndexQuiet.display(), "git diff-index --quiet HEAD --");
        assert_eq!(GitCommand::ShowCurrentBranch.display(), "git branch --show-current");
        assert_eq!(
            GitCommand::Add { path: Path::new("pyproject.toml") }.display(),
            "git add pyproject.toml"
        );
        assert_eq!(
            GitCommand::PushTag { remote: "origin", tag: "v1.2.4" }.display(),
            "git push origin v1.2.4"
        );
        assert_eq!(GitCommand::Push.display(), "git push");
    }

    #[test]
    fn test_message_is_a_single_argument() {
        let cmd = GitCommand::Commit { message: "Fix \"quotes\"; rm -rf / - v1.0.0" };
        let args = cmd.args();
        assert_eq!(args.len(), 3);
        assert_eq!(args[2], OsString::from("Fix \"quotes\"; rm -rf / - v1.0.0"));
    }

    #[test]
    fn test_display_quotes_whitespace() {
        let cmd = GitCommand::AnnotatedTag { name: "v2.0.0", message: "Version v2.0.0" };
        assert_eq!(cmd.display(), "git tag -a v2.0.0 -m 'Version v2.0.0'");
    }

    #[test]
    fn test_push_classification() {
        assert!(GitCommand::Push.is_push());
        assert!(GitCommand::PushTag { remote: "origin", tag: "v1" }.is_push());
        assert!(!GitCommand::Commit { message: "x" }.is_push());
    }
}
