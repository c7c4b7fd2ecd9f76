//! Domain logic - pure release rules independent of git and the filesystem

pub mod branch;
pub mod version;

pub use branch::BranchContext;
pub use version::{BumpKind, Version, VersionStyle};
