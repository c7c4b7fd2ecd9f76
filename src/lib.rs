pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod preflight;
pub mod process;
pub mod release;
pub mod store;
pub mod ui;
pub mod warning;

pub use error::{GitBumpError, Result};
