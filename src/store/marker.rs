use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::domain::{Version, VersionStyle};
use crate::error::{GitBumpError, Result};
use crate::store::{read_file, VersionRecord, VersionStore};

/// Matches `__version__ = "1.2.3"`, `__version__: str = '1.2.3'` and the like.
/// Group 1 or 2 holds the value, depending on the quote style.
fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^[ \t]*__version__[ \t]*(?::[^=\r\n]*)?=[ \t]*(?:"([^"\r\n]*)"|'([^'\r\n]*)')"#,
        )
        .expect("marker regex is valid")
    })
}

/// Byte ranges of every marker value in `content`
fn marker_spans(content: &str) -> Vec<std::ops::Range<usize>> {
    marker_regex()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.range())
        .collect()
}

/// Version kept in a `__version__` line of exactly one source file
#[derive(Debug)]
pub struct MarkerStore {
    root: PathBuf,
    relative: PathBuf,
}

impl MarkerStore {
    /// Use a known file, path relative to `root`
    pub fn new(root: impl Into<PathBuf>, relative: impl Into<PathBuf>) -> Self {
        MarkerStore {
            root: root.into(),
            relative: relative.into(),
        }
    }

    /// Find the single file named `file_name` under `root/source_root` that
    /// carries a version marker.
    ///
    /// # Returns
    /// * `Ok(MarkerStore)` - Exactly one candidate was found
    /// * `Err(NoVersionFileFound)` - No candidate
    /// * `Err(AmbiguousVersionFile)` - More than one candidate; nothing is guessed
    pub fn discover(root: &Path, source_root: &Path, file_name: &str) -> Result<Self> {
        let search = root.join(source_root);
        let mut candidates = Vec::new();

        for entry in WalkDir::new(&search)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden_or_cache(e.file_name()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || entry.file_name() != file_name {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(entry.path()) else {
                continue;
            };
            if !marker_spans(&content).is_empty() {
                let relative = entry
                    .path()
                    .strip_prefix(root)
                    .unwrap_or(entry.path())
                    .to_path_buf();
                tracing::debug!(candidate = %relative.display(), "found version marker");
                candidates.push(relative);
            }
        }

        match candidates.len() {
            0 => Err(GitBumpError::NoVersionFileFound(format!(
                "no {} with a __version__ line under {}",
                file_name,
                search.display()
            ))),
            1 => Ok(MarkerStore::new(root, candidates.remove(0))),
            _ => Err(GitBumpError::AmbiguousVersionFile(candidates)),
        }
    }

    fn path(&self) -> PathBuf {
        self.root.join(&self.relative)
    }

    fn single_span(path: &Path, content: &str) -> Result<std::ops::Range<usize>> {
        let mut spans = marker_spans(content);
        match spans.len() {
            0 => Err(GitBumpError::read(path, "no __version__ line")),
            1 => Ok(spans.remove(0)),
            n => Err(GitBumpError::read(
                path,
                format!("{} __version__ lines, expected one", n),
            )),
        }
    }
}

fn is_hidden_or_cache(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    (name.starts_with('.') && name.len() > 1) || name == "__pycache__"
}

impl VersionStore for MarkerStore {
    fn relative_path(&self) -> &Path {
        &self.relative
    }

    fn style(&self) -> VersionStyle {
        VersionStyle::Bare
    }

    fn read(&self) -> Result<(VersionRecord, Version)> {
        let path = self.path();
        if !path.is_file() {
            return Err(GitBumpError::NoVersionFileFound(format!(
                "{} does not exist",
                path.display()
            )));
        }

        let snapshot = read_file(&path)?;
        let span = Self::single_span(&path, &snapshot)?;
        let raw = snapshot[span].to_string();
        let version = Version::parse(&raw)?;
        tracing::debug!(path = %path.display(), %raw, "read version");

        Ok((
            VersionRecord {
                path,
                snapshot,
                raw,
            },
            version,
        ))
    }

    fn render(&self, record: &VersionRecord, version: &Version) -> Result<String> {
        let span = Self::single_span(&record.path, &record.snapshot)
            .map_err(|e| GitBumpError::write(&record.path, e))?;

        let mut content = String::with_capacity(record.snapshot.len() + 4);
        content.push_str(&record.snapshot[..span.start]);
        content.push_str(&version.format(self.style()));
        content.push_str(&record.snapshot[span.end..]);
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BumpKind;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_marker_spans_quote_styles() {
        assert_eq!(marker_spans("__version__ = \"1.2.3\"\n").len(), 1);
        assert_eq!(marker_spans("__version__='1.2.3'\n").len(), 1);
        assert_eq!(marker_spans("__version__: str = \"1.2.3\"\n").len(), 1);
        assert!(marker_spans("# __version__ = \"1.2.3\"\n").is_empty());
        assert!(marker_spans("version = \"1.2.3\"\n").is_empty());
    }

    #[test]
    fn test_discover_single_candidate() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/template/__init__.py", "__version__ = \"1.2.3\"\n");
        write(dir.path(), "src/template/tests/__init__.py", "");

        let store = MarkerStore::discover(dir.path(), Path::new("src"), "__init__.py").unwrap();
        assert_eq!(store.relative_path(), Path::new("src/template/__init__.py"));
    }

    #[test]
    fn test_discover_none() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/template/__init__.py", "from .template import Template\n");

        let err = MarkerStore::discover(dir.path(), Path::new("src"), "__init__.py").unwrap_err();
        assert!(matches!(err, GitBumpError::NoVersionFileFound(_)));
    }

    #[test]
    fn test_discover_missing_source_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = MarkerStore::discover(dir.path(), Path::new("src"), "__init__.py").unwrap_err();
        assert!(matches!(err, GitBumpError::NoVersionFileFound(_)));
    }

    #[test]
    fn test_discover_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/template/__init__.py", "__version__ = \"1.2.3\"\n");
        write(dir.path(), "src/templatelib/__init__.py", "__version__ = \"0.4.0\"\n");

        match MarkerStore::discover(dir.path(), Path::new("src"), "__init__.py") {
            Err(GitBumpError::AmbiguousVersionFile(paths)) => {
                assert_eq!(
                    paths,
                    vec![
                        PathBuf::from("src/template/__init__.py"),
                        PathBuf::from("src/templatelib/__init__.py"),
                    ]
                );
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("discovery should refuse to pick a file"),
        }
    }

    #[test]
    fn test_discover_skips_pycache() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/pkg/__init__.py", "__version__ = \"1.0.0\"\n");
        write(dir.path(), "src/pkg/__pycache__/__init__.py", "__version__ = \"0.9.0\"\n");

        assert!(MarkerStore::discover(dir.path(), Path::new("src"), "__init__.py").is_ok());
    }

    #[test]
    fn test_write_replaces_only_value() {
        let dir = tempfile::tempdir().unwrap();
        let original = "\"\"\"Package.\"\"\"\r\n__version__ = '1.2.3'  # managed\r\n\r\nfrom .template import Template\r\n";
        write(dir.path(), "src/pkg/__init__.py", original);

        let store = MarkerStore::new(dir.path(), "src/pkg/__init__.py");
        let (record, version) = store.read().unwrap();
        assert_eq!(record.raw, "1.2.3");
        store.write(&record, &version.bump(BumpKind::Minor)).unwrap();

        let written = fs::read_to_string(dir.path().join("src/pkg/__init__.py")).unwrap();
        assert_eq!(written, original.replace("'1.2.3'", "'1.3.0'"));
    }

    #[test]
    fn test_write_then_rollback_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let original = "__version__ = \"v2.0.9\"\n__all__ = [\"Template\"]\n";
        write(dir.path(), "src/pkg/__init__.py", original);
        let path = dir.path().join("src/pkg/__init__.py");
        let before = fs::read(&path).unwrap();

        let store = MarkerStore::new(dir.path(), "src/pkg/__init__.py");
        let (record, version) = store.read().unwrap();
        store.write(&record, &version.bump(BumpKind::Patch)).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "__version__ = \"2.0.10\"\n__all__ = [\"Template\"]\n"
        );

        store.rollback(&record).unwrap();
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_two_markers_in_one_file() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "src/pkg/__init__.py",
            "__version__ = \"1.0.0\"\n__version__ = \"1.0.1\"\n",
        );
        let store = MarkerStore::new(dir.path(), "src/pkg/__init__.py");
        assert!(matches!(
            store.read(),
            Err(GitBumpError::VersionStoreReadError { .. })
        ));
    }
}
