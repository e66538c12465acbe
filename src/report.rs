//! Plain-text inspection report.

use crate::error::{InspectError, Result};
use crate::git::{CommitInfo, Inspector};
use crate::range::AncestryRange;
use std::fmt;
use tracing::{debug, info};

/// Default number of recent commits listed.
pub const DEFAULT_MAX_COUNT: usize = 10;

/// Branch, history size and latest commit of a repository.
#[derive(Debug, Clone)]
pub struct Report {
    branch: String,
    commit_count: usize,
    latest: CommitInfo,
    range: AncestryRange,
}

impl Report {
    /// Reads the repository and cross-checks the two commit listings.
    ///
    /// The recent listing and the matching `HEAD~(n-1)..HEAD` range must start
    /// at the same commit. With fewer than two commits the range is empty and
    /// the check is skipped.
    ///
    /// # Errors
    ///
    /// Fails if any repository read fails, or with
    /// [`InspectError::RangeMismatch`] when the listings disagree.
    pub fn collect(inspector: &Inspector, max_count: usize) -> Result<Self> {
        let branch = inspector.active_branch()?;
        info!(%branch, "active branch");

        let commits = inspector
            .recent_commits(max_count)?
            .collect::<Result<Vec<_>>>()?;
        let latest = commits.first().cloned().ok_or(InspectError::NoCommits)?;

        let range = AncestryRange::from_count(commits.len());
        if range.back() == 0 {
            debug!(%range, "range is empty, skipping consistency check");
        } else {
            let expr = range.to_string();
            let first = inspector
                .commits_in_range(&expr)?
                .next()
                .transpose()?
                .ok_or_else(|| InspectError::invalid_range(&expr, "range selects no commits"))?;

            if first.oid() != latest.oid() {
                return Err(InspectError::RangeMismatch {
                    expected: latest.oid().to_string(),
                    found: first.oid().to_string(),
                });
            }
            debug!(%range, oid = latest.oid(), "range listing agrees with recent commits");
        }

        Ok(Self {
            branch,
            commit_count: commits.len(),
            latest,
            range,
        })
    }

    /// Checked out branch name.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Number of commits listed.
    pub fn commit_count(&self) -> usize {
        self.commit_count
    }

    /// Most recent commit.
    pub fn latest(&self) -> &CommitInfo {
        &self.latest
    }

    /// Range used for the consistency check.
    pub fn range(&self) -> &AncestryRange {
        &self.range
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Active branch: {}", self.branch)?;
        writeln!(f, "Num commits: {}", self.commit_count)?;
        writeln!(f, "Last commit: {}", self.latest.summary())?;
        writeln!(f, "Last commit sha: {}", self.latest.oid())?;
        writeln!(f, "Last commit author: {}", self.latest.author())
    }
}
