//! Version store adapters
//!
//! A version store is the single file treated as the authoritative current
//! version. Two conventions are supported:
//!
//! - [PyprojectStore]: `project.version` in a TOML project document
//! - [MarkerStore]: a `__version__ = "<value>"` line in one source file
//!
//! Both keep a verbatim snapshot of the file in the [VersionRecord] so that a
//! failed release can restore it byte for byte.

pub mod marker;
pub mod pyproject;

pub use marker::MarkerStore;
pub use pyproject::PyprojectStore;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{StoreConfig, StoreKind};
use crate::domain::{Version, VersionStyle};
use crate::error::{GitBumpError, Result};

/// Contents of the version file as read at the start of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Exact file content before any mutation
    pub snapshot: String,
    /// The version text as it appeared in the file
    pub raw: String,
}

/// Reads, rewrites and restores the persisted version
pub trait VersionStore {
    /// Path of the version file relative to the work tree root
    fn relative_path(&self) -> &Path;

    /// How versions are written back by this store
    fn style(&self) -> VersionStyle;

    /// Load the file and extract the current version
    fn read(&self) -> Result<(VersionRecord, Version)>;

    /// New file content with only the version value replaced
    fn render(&self, record: &VersionRecord, version: &Version) -> Result<String>;

    /// Persist `version`, leaving every other byte of the file untouched
    fn write(&self, record: &VersionRecord, version: &Version) -> Result<()> {
        let content = self.render(record, version)?;
        tracing::info!(path = %record.path.display(), version = %version, "writing version");
        fs::write(&record.path, content).map_err(|e| GitBumpError::write(&record.path, e))
    }

    /// Restore the snapshot taken by [VersionStore::read]
    fn rollback(&self, record: &VersionRecord) -> Result<()> {
        tracing::info!(path = %record.path.display(), "restoring original version file");
        fs::write(&record.path, record.snapshot.as_bytes())
            .map_err(|e| GitBumpError::write(&record.path, e))
    }
}

impl<S: VersionStore + ?Sized> VersionStore for Box<S> {
    fn relative_path(&self) -> &Path {
        (**self).relative_path()
    }

    fn style(&self) -> VersionStyle {
        (**self).style()
    }

    fn read(&self) -> Result<(VersionRecord, Version)> {
        (**self).read()
    }

    fn render(&self, record: &VersionRecord, version: &Version) -> Result<String> {
        (**self).render(record, version)
    }

    fn write(&self, record: &VersionRecord, version: &Version) -> Result<()> {
        (**self).write(record, version)
    }

    fn rollback(&self, record: &VersionRecord) -> Result<()> {
        (**self).rollback(record)
    }
}

pub(crate) fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| GitBumpError::read(path, e))
}

/// Open the version store selected by `kind`
///
/// `Auto` prefers the project document when it exists and declares
/// `project.version`, and otherwise falls back to marker discovery. A project
/// document that exists but cannot be read or parsed stops selection.
pub fn open_store(
    root: &Path,
    config: &StoreConfig,
    kind: StoreKind,
) -> Result<Box<dyn VersionStore>> {
    match kind {
        StoreKind::Pyproject => Ok(Box::new(PyprojectStore::new(root, &config.pyproject))),
        StoreKind::Marker => Ok(Box::new(MarkerStore::discover(
            root,
            &config.source_root,
            &config.marker_file,
        )?)),
        StoreKind::Auto => {
            let pyproject = PyprojectStore::new(root, &config.pyproject);
            if pyproject.declares_version()? {
                tracing::debug!("using pyproject version store");
                Ok(Box::new(pyproject))
            } else {
                tracing::debug!("no project.version, looking for a version marker");
                open_store(root, config, StoreKind::Marker)
            }
        }
    }
}
