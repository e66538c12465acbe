//! Ancestry range expressions.

use std::fmt;

/// Range covering a tip and the commits up to `back` first-parent steps behind it.
///
/// Renders as `tip~back..tip`. The lower bound is exclusive, so
/// `HEAD~9..HEAD` selects the nine commits above `HEAD~9` on a linear history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestryRange {
    tip: String,
    back: usize,
}

impl AncestryRange {
    /// Creates a range ending at `tip`.
    pub fn new(tip: impl Into<String>, back: usize) -> Self {
        Self {
            tip: tip.into(),
            back,
        }
    }

    /// Range from `HEAD` reaching `count - 1` commits back.
    ///
    /// Mirrors a listing of `count` commits: its first element is the tip.
    pub fn from_count(count: usize) -> Self {
        Self::new("HEAD", count.saturating_sub(1))
    }

    /// Revision at the upper end of the range.
    pub fn tip(&self) -> &str {
        &self.tip
    }

    /// Number of first-parent steps to the lower bound.
    pub fn back(&self) -> usize {
        self.back
    }
}

impl fmt::Display for AncestryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{tip}~{back}..{tip}", tip = self.tip, back = self.back)
    }
}
