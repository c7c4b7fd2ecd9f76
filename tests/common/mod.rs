// tests/common/mod.rs
#![allow(dead_code)]

use git2::{Repository, RepositoryInitOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A work tree cloned from a bare remote, both inside one temp dir
pub struct Fixture {
    _root: TempDir,
    pub work: PathBuf,
    pub remote: PathBuf,
}

impl Fixture {
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.work.join(rel)).expect("Could not read work tree file")
    }

    pub fn write(&self, rel: &str, content: &str) {
        write_file(&self.work, rel, content);
    }

    /// Run git in the work tree and return trimmed stdout
    pub fn git(&self, args: &[&str]) -> String {
        git(&self.work, args)
    }

    /// Run git against the bare remote and return trimmed stdout
    pub fn remote_git(&self, args: &[&str]) -> String {
        git(&self.remote, args)
    }
}

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).expect("Could not create directories");
    fs::write(path, content).expect("Could not write file");
}

/// Create a repository on `main` holding `files` in one commit, pushed to a
/// bare `origin` with upstream tracking set.
pub fn setup_release_repo(files: &[(&str, &str)]) -> Fixture {
    let root = TempDir::new().expect("Could not create temp dir");
    let remote = root.path().join("remote.git");
    let work = root.path().join("work");

    Repository::init_bare(&remote).expect("Could not init bare remote");

    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = Repository::init_opts(&work, &opts).expect("Could not init git repo");
    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
        config
            .set_bool("commit.gpgsign", false)
            .expect("Could not set commit.gpgsign");
        config
            .set_bool("tag.gpgsign", false)
            .expect("Could not set tag.gpgsign");
    }

    let mut index = repo.index().expect("Could not get index");
    for (rel, content) in files {
        write_file(&work, rel, content);
        index
            .add_path(Path::new(rel))
            .expect("Could not add file to index");
    }
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = repo.signature().expect("Could not get sig");
    repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
        .expect("Could not create commit");

    let remote_url = remote.to_str().expect("Temp path is not UTF-8");
    git(&work, &["remote", "add", "origin", remote_url]);
    git(&work, &["push", "--quiet", "-u", "origin", "main"]);

    Fixture {
        _root: root,
        work,
        remote,
    }
}
