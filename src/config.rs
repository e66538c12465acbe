//! Command line configuration.

use crate::report::DEFAULT_MAX_COUNT;
use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;

/// Command line configuration for Gitglance.
#[derive(Debug, Clone, Parser)]
#[command(name = "gitglance", version, about, long_about = None)]
pub struct Config {
    /// Repository path
    #[arg(default_value = "..")]
    pub repo: PathBuf,

    /// Number of recent commits to list
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_COUNT)]
    pub max_count: usize,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if repository path does not exist or no commits are requested.
    pub fn validate(&self) -> Result<()> {
        if !self.repo.exists() {
            bail!("Repository path does not exist: {}", self.repo.display());
        }

        if self.max_count == 0 {
            bail!("--max-count must be at least 1");
        }

        Ok(())
    }
}
