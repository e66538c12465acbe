//! Read-only inspector for git repositories.

mod config;
mod error;
mod git;
pub mod logging;
mod range;
mod report;

pub use config::Config;
pub use error::{BoxError, InspectError, Result};
pub use git::{CommitInfo, Commits, Inspector};
pub use range::AncestryRange;
pub use report::{DEFAULT_MAX_COUNT, Report};
