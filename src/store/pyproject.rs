use std::ops::Range;
use std::path::{Path, PathBuf};

use toml_edit::{Document, Item};

use crate::domain::{Version, VersionStyle};
use crate::error::{GitBumpError, Result};
use crate::store::{read_file, VersionRecord, VersionStore};

/// Version kept at `project.version` in a TOML project document
///
/// `toml_edit` locates the value; the rewrite splices the new version between
/// the original quotes, so line endings, quoting and comments are untouched.
#[derive(Debug)]
pub struct PyprojectStore {
    root: PathBuf,
    relative: PathBuf,
}

impl PyprojectStore {
    pub fn new(root: impl Into<PathBuf>, relative: impl Into<PathBuf>) -> Self {
        PyprojectStore {
            root: root.into(),
            relative: relative.into(),
        }
    }

    fn path(&self) -> PathBuf {
        self.root.join(&self.relative)
    }

    /// Whether the document carries a `project.version` key
    ///
    /// A missing file is `false`. A file that exists but cannot be read or
    /// parsed is an error, since it may well hold the authoritative version.
    pub fn declares_version(&self) -> Result<bool> {
        let path = self.path();
        if !path.is_file() {
            return Ok(false);
        }
        let content = read_file(&path)?;
        let doc = parse(&path, &content)?;
        Ok(version_item(&doc).is_some())
    }
}

fn parse<'a>(path: &Path, content: &'a str) -> Result<Document<&'a str>> {
    Document::parse(content).map_err(|e| GitBumpError::read(path, e))
}

fn version_item<'d>(doc: &'d Document<&str>) -> Option<&'d Item> {
    doc.as_item()
        .get("project")
        .and_then(|project| project.get("version"))
}

fn version_text(path: &Path, content: &str) -> Result<String> {
    let doc = parse(path, content)?;
    let raw = version_item(&doc)
        .and_then(Item::as_str)
        .ok_or_else(|| GitBumpError::read(path, "no string value at project.version"))?;
    Ok(raw.to_string())
}

/// Byte range of the version text inside its quotes
fn value_span(path: &Path, content: &str, item: &Item) -> Result<Range<usize>> {
    let literal = item
        .span()
        .ok_or_else(|| GitBumpError::read(path, "project.version has no source location"))?;
    let text = &content[literal.clone()];
    let quote = if text.starts_with("\"\"\"") || text.starts_with("'''") {
        3
    } else {
        1
    };
    if text.len() < 2 * quote {
        return Err(GitBumpError::read(path, "project.version is not a quoted string"));
    }
    Ok(literal.start + quote..literal.end - quote)
}

impl VersionStore for PyprojectStore {
    fn relative_path(&self) -> &Path {
        &self.relative
    }

    fn style(&self) -> VersionStyle {
        VersionStyle::Prefixed
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
        let raw = version_text(&path, &snapshot)?;

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
        let content = record.snapshot.as_str();
        let doc = parse(&record.path, content)?;
        let item = version_item(&doc)
            .ok_or_else(|| GitBumpError::write(&record.path, "project.version disappeared"))?;
        let span = value_span(&record.path, content, item)?;

        // escapes would make the literal differ from the decoded value
        if content[span.clone()] != record.raw {
            return Err(GitBumpError::write(
                &record.path,
                "project.version is not a plain string literal",
            ));
        }

        let mut rendered = String::with_capacity(content.len() + 2);
        rendered.push_str(&content[..span.start]);
        rendered.push_str(&version.format(self.style()));
        rendered.push_str(&content[span.end..]);
        Ok(rendered)
    }
}
