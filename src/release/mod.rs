//! Release execution: plan, executor with rollback, and the workflow driver

pub mod executor;
pub mod plan;
pub mod workflow;

pub use executor::{ReleaseExecutor, ReleaseFailure};
pub use plan::{ReleasePlan, ReleaseStep};
pub use workflow::{Outcome, Release, ReleaseConfig};
