use crate::error::{GitBumpError, Result};
use std::fmt;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// Which component of a version to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
}

impl BumpKind {
    pub fn name(&self) -> &'static str {
        match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a version is rendered where it is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStyle {
    /// `v1.2.3`
    Prefixed,
    /// `1.2.3`
    Bare,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string (e.g., "v1.2.3" -> Version(1,2,3))
    ///
    /// A single leading `v` or `V` is accepted. Exactly three dot-separated
    /// unsigned integer components are required.
    pub fn parse(input: &str) -> Result<Self> {
        let clean = input
            .strip_prefix('v')
            .or_else(|| input.strip_prefix('V'))
            .unwrap_or(input);

        let parts: Vec<&str> = clean.split('.').collect();
        if parts.len() != 3 {
            return Err(GitBumpError::version(format!(
                "'{}' - expected v<major>.<minor>.<patch>",
                input
            )));
        }

        let component = |name: &str, raw: &str| -> Result<u32> {
            // u32::from_str accepts a leading '+', which is not a version digit
            if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
                return Err(GitBumpError::version(format!(
                    "'{}' - {} component '{}' is not an integer",
                    input, name, raw
                )));
            }
            raw.parse::<u32>().map_err(|_| {
                GitBumpError::version(format!(
                    "'{}' - {} component '{}' is out of range",
                    input, name, raw
                ))
            })
        };

        Ok(Version {
            major: component("major", parts[0])?,
            minor: component("minor", parts[1])?,
            patch: component("patch", parts[2])?,
        })
    }

    /// Bump version according to bump kind
    ///
    /// Fails only if the incremented component would overflow.
    pub fn checked_bump(&self, kind: BumpKind) -> Result<Self> {
        let overflow =
            || GitBumpError::version(format!("{} component of {} overflows", kind, self));
        let bumped = match kind {
            BumpKind::Major => Version::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0),
            BumpKind::Minor => Version::new(
                self.major,
                self.minor.checked_add(1).ok_or_else(overflow)?,
                0,
            ),
            BumpKind::Patch => Version::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        };
        Ok(bumped)
    }

    /// Like [Version::checked_bump], for versions known not to be at `u32::MAX`
    pub fn bump(&self, kind: BumpKind) -> Self {
        match kind {
            BumpKind::Major => Version::new(self.major + 1, 0, 0),
            BumpKind::Minor => Version::new(self.major, self.minor + 1, 0),
            BumpKind::Patch => Version::new(self.major, self.minor, self.patch + 1),
        }
    }

    /// Render in the given persisted style
    pub fn format(&self, style: VersionStyle) -> String {
        match style {
            VersionStyle::Prefixed => format!("v{}", self),
            VersionStyle::Bare => self.to_string(),
        }
    }

    /// Tag name for this version, always `v`-prefixed
    pub fn tag_name(&self) -> String {
        self.format(VersionStyle::Prefixed)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
