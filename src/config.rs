use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GitBumpError, Result};

/// Represents the complete configuration for git-bump.
///
/// Contains the accepted release branches, the remote to push to, the test
/// command, version store selection and external command timeouts.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_release_branches")]
    pub release_branches: Vec<String>,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default)]
    pub tests: TestsConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

/// Returns the default list of branches a release may be cut from.
fn default_release_branches() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_test_command() -> Vec<String> {
    vec!["pytest".to_string()]
}

/// Test suite invocation run during preflight.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TestsConfig {
    /// Program followed by its arguments
    #[serde(default = "default_test_command")]
    pub command: Vec<String>,
}

impl Default for TestsConfig {
    fn default() -> Self {
        TestsConfig {
            command: default_test_command(),
        }
    }
}

/// Which version store convention to use.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// `pyproject` if it carries `project.version`, otherwise `marker`
    #[default]
    Auto,
    Pyproject,
    Marker,
}

impl std::str::FromStr for StoreKind {
    type Err = GitBumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(StoreKind::Auto),
            "pyproject" => Ok(StoreKind::Pyproject),
            "marker" => Ok(StoreKind::Marker),
            other => Err(GitBumpError::config(format!(
                "unknown store kind '{}' (expected auto, pyproject or marker)",
                other
            ))),
        }
    }
}

fn default_pyproject() -> PathBuf {
    PathBuf::from("pyproject.toml")
}

fn default_source_root() -> PathBuf {
    PathBuf::from("src")
}

fn default_marker_file() -> String {
    "__init__.py".to_string()
}

/// Location of the authoritative version.
///
/// Paths are relative to the repository root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub kind: StoreKind,

    #[serde(default = "default_pyproject")]
    pub pyproject: PathBuf,

    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    #[serde(default = "default_marker_file")]
    pub marker_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            kind: StoreKind::Auto,
            pyproject: default_pyproject(),
            source_root: default_source_root(),
            marker_file: default_marker_file(),
        }
    }
}

/// Upper bounds for long-running external commands. Zero disables the limit.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct TimeoutsConfig {
    #[serde(default)]
    pub tests_secs: u64,

    #[serde(default)]
    pub push_secs: u64,
}

impl TimeoutsConfig {
    pub fn tests(&self) -> Option<Duration> {
        (self.tests_secs > 0).then(|| Duration::from_secs(self.tests_secs))
    }

    pub fn push(&self) -> Option<Duration> {
        (self.push_secs > 0).then(|| Duration::from_secs(self.push_secs))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            release_branches: default_release_branches(),
            remote: default_remote(),
            tests: TestsConfig::default(),
            store: StoreConfig::default(),
            timeouts: TimeoutsConfig::default(),
        }
    }
}

impl Settings {
    fn validate(self) -> Result<Self> {
        if self.tests.command.is_empty() {
            return Err(GitBumpError::config("tests.command must name a program"));
        }
        if self.remote.trim().is_empty() {
            return Err(GitBumpError::config("remote must not be empty"));
        }
        Ok(self)
    }
}

/// Loads settings from file or returns defaults.
///
/// Attempts to load settings in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitbump.toml` in the repository root
/// 3. `~/.config/.gitbump.toml` in user config directory
/// 4. Default settings if no file found
///
/// # Returns
/// * `Ok(Settings)` - Loaded or default settings
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_settings(config_path: Option<&Path>, repo_root: &Path) -> Result<Settings> {
    let local = repo_root.join("gitbump.toml");

    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if local.exists() {
        local
    } else if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join(".gitbump.toml");
        if global.exists() {
            global
        } else {
            return Ok(Settings::default());
        }
    } else {
        return Ok(Settings::default());
    };

    tracing::debug!(path = %path.display(), "loading settings");
    let raw = fs::read_to_string(&path)
        .map_err(|e| GitBumpError::config(format!("cannot read {}: {}", path.display(), e)))?;
    parse_settings(&raw)
}

/// Parses settings from TOML text, filling unspecified fields with defaults.
pub fn parse_settings(raw: &str) -> Result<Settings> {
    let settings: Settings =
        toml::from_str(raw).map_err(|e| GitBumpError::config(e.to_string()))?;
    settings.validate()
}
