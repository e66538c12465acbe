//! Read-only git repository operations.

use crate::error::{InspectError, Result};
use gix::bstr::ByteSlice;
use gix::traverse::commit::simple::Sorting;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// First error raised inside a walk's selection filter.
type FailureSlot = Rc<RefCell<Option<InspectError>>>;

/// Commit metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    oid: String,
    short_oid: String,
    summary: String,
    message: String,
    author: String,
    author_email: String,
    date: i64,
}

impl CommitInfo {
    /// Full commit hash.
    pub fn oid(&self) -> &str {
        &self.oid
    }

    /// Short commit hash (7 characters).
    pub fn short_oid(&self) -> &str {
        &self.short_oid
    }

    /// First line of commit message.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Full commit message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Author name.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Author email.
    pub fn author_email(&self) -> &str {
        &self.author_email
    }

    /// Author timestamp (Unix seconds).
    pub fn date(&self) -> i64 {
        self.date
    }

    fn from_commit(commit: &gix::Commit<'_>) -> Result<Self> {
        let author = commit.author().map_err(InspectError::traversal)?;
        let message = commit
            .message_raw()
            .map_err(InspectError::traversal)?
            .to_str_lossy()
            .to_string();
        let summary = message.lines().next().unwrap_or("").to_string();

        Ok(CommitInfo {
            oid: commit.id.to_hex().to_string(),
            short_oid: commit.id.to_hex_with_len(7).to_string(),
            summary,
            message,
            author: author.name.to_str_lossy().to_string(),
            author_email: author.email.to_str_lossy().to_string(),
            date: author.time.seconds,
        })
    }
}

/// Lazy sequence of commits, newest first by commit time.
///
/// Objects are only read as the iterator advances.
pub struct Commits<'repo> {
    walk: gix::revision::Walk<'repo>,
    remaining: Option<usize>,
    failure: FailureSlot,
}

impl Iterator for Commits<'_> {
    type Item = Result<CommitInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }

        let next = self.walk.next();
        if let Some(err) = self.failure.borrow_mut().take() {
            self.remaining = Some(0);
            return Some(Err(err));
        }

        let info = match next? {
            Ok(info) => info,
            Err(e) => return Some(Err(InspectError::traversal(e))),
        };

        Some(
            info.object()
                .map_err(InspectError::traversal)
                .and_then(|commit| CommitInfo::from_commit(&commit)),
        )
    }
}

/// Commits reachable from the excluded end of a range.
///
/// Walked newest first and only as far back as the oldest commit asked about,
/// so membership is settled without reading the whole history below it.
struct Excluded<'repo> {
    repo: &'repo gix::Repository,
    walk: gix::revision::Walk<'repo>,
    seen: HashSet<gix::ObjectId>,
    oldest: Option<i64>,
}

impl<'repo> Excluded<'repo> {
    fn new(repo: &'repo gix::Repository, from: gix::ObjectId) -> Result<Self> {
        let walk = newest_first(repo, from)
            .all()
            .map_err(InspectError::traversal)?;

        Ok(Self {
            repo,
            walk,
            seen: HashSet::new(),
            oldest: None,
        })
    }

    fn contains(&mut self, id: gix::ObjectId) -> Result<bool> {
        if self.seen.contains(&id) {
            return Ok(true);
        }

        let time = commit_time(self.repo, id)?;
        while self.oldest.is_none_or(|oldest| oldest >= time) {
            let Some(info) = self.walk.next() else {
                break;
            };
            let info = info.map_err(InspectError::traversal)?;
            let seen_time = match info.commit_time {
                Some(seconds) => seconds,
                None => commit_time(self.repo, info.id)?,
            };

            self.oldest = Some(seen_time);
            self.seen.insert(info.id);
            if info.id == id {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

fn newest_first(
    repo: &gix::Repository,
    tip: gix::ObjectId,
) -> gix::revision::walk::Platform<'_> {
    repo.rev_walk([tip]).sorting(Sorting::ByCommitTimeNewestFirst)
}

fn commit_time(repo: &gix::Repository, id: gix::ObjectId) -> Result<i64> {
    let commit = repo
        .find_object(id)
        .map_err(InspectError::traversal)?
        .try_into_commit()
        .map_err(InspectError::traversal)?;
    let committer = commit.committer().map_err(InspectError::traversal)?;

    Ok(committer.time.seconds)
}

/// Read-only handle on a repository.
pub struct Inspector {
    repo: gix::Repository,
    path: PathBuf,
}

impl Inspector {
    /// Opens the repository at `path`.
    ///
    /// The path must be the repository itself (work tree or git dir); parent
    /// directories are not searched.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::NotARepository`] if `path` holds no git repository.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gitglance::Inspector;
    ///
    /// let inspector = Inspector::open(".")?;
    /// println!("{}", inspector.active_branch()?);
    /// # Ok::<(), gitglance::InspectError>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let repo = gix::open(path).map_err(|source| InspectError::NotARepository {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

        debug!(path = %path.display(), git_dir = %repo.git_dir().display(), "opened repository");

        Ok(Self {
            repo,
            path: path.to_path_buf(),
        })
    }

    /// Path the repository was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Short name of the checked out branch.
    ///
    /// An unborn branch still reports its name.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::DetachedHead`] when HEAD points directly at a commit.
    pub fn active_branch(&self) -> Result<String> {
        let name = self
            .repo
            .head_name()
            .map_err(InspectError::traversal)?
            .ok_or(InspectError::DetachedHead)?;

        Ok(name.shorten().to_str_lossy().into_owned())
    }

    /// Walks at most `max_count` commits back from the current tip.
    ///
    /// Every call starts a fresh walk.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::NoCommits`] if HEAD has no commit yet.
    pub fn recent_commits(&self, max_count: usize) -> Result<Commits<'_>> {
        let tip = self.tip()?;
        let walk = newest_first(&self.repo, tip)
            .all()
            .map_err(InspectError::traversal)?;

        Ok(Commits {
            walk,
            remaining: Some(max_count),
            failure: FailureSlot::default(),
        })
    }

    /// Walks the commits selected by a revision expression.
    ///
    /// `A..B` yields commits reachable from `B` but not from `A`. A single
    /// revision yields it and all of its ancestors.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::InvalidRange`] if the expression does not parse,
    /// names a missing revision, or uses a form other than the two above.
    pub fn commits_in_range(&self, range_expr: &str) -> Result<Commits<'_>> {
        use gix::revision::plumbing::Spec;

        let spec = self
            .repo
            .rev_parse(range_expr)
            .map_err(|e| InspectError::invalid_range(range_expr, e))?;

        let failure = FailureSlot::default();
        let (walk, remaining) = match spec.detach() {
            Spec::Range { from, to } => {
                let from = self.peel_to_commit(range_expr, from)?;
                let to = self.peel_to_commit(range_expr, to)?;
                debug!(%from, %to, "resolved range");

                let mut excluded = Excluded::new(&self.repo, from)?;
                let remaining = excluded.contains(to)?.then_some(0);
                let slot = Rc::clone(&failure);
                let walk = newest_first(&self.repo, to).selected(move |id| {
                    match excluded.contains(id.to_owned()) {
                        Ok(hidden) => !hidden,
                        Err(err) => {
                            slot.borrow_mut().get_or_insert(err);
                            false
                        }
                    }
                });
                (walk, remaining)
            }
            Spec::Include(id) => {
                let tip = self.peel_to_commit(range_expr, id)?;
                debug!(%tip, "resolved single revision");

                (newest_first(&self.repo, tip).all(), None)
            }
            other => {
                return Err(InspectError::invalid_range(
                    range_expr,
                    format!("unsupported revision form {other:?}"),
                ));
            }
        };

        Ok(Commits {
            walk: walk.map_err(InspectError::traversal)?,
            remaining,
            failure,
        })
    }

    /// Commit at the current tip.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::NoCommits`] if HEAD has no commit yet.
    pub fn latest_commit(&self) -> Result<CommitInfo> {
        self.recent_commits(1)?
            .next()
            .unwrap_or(Err(InspectError::NoCommits))
    }

    fn tip(&self) -> Result<gix::ObjectId> {
        let head = self.repo.head().map_err(InspectError::traversal)?;
        head.id()
            .map(|id| id.detach())
            .ok_or(InspectError::NoCommits)
    }

    fn peel_to_commit(&self, expr: &str, id: gix::ObjectId) -> Result<gix::ObjectId> {
        let object = self
            .repo
            .find_object(id)
            .map_err(|e| InspectError::invalid_range(expr, e))?;
        let commit = object
            .peel_to_kind(gix::object::Kind::Commit)
            .map_err(|e| InspectError::invalid_range(expr, e))?;

        Ok(commit.id)
    }
}

#[cfg(test)]
impl CommitInfo {
    /// Creates a new CommitInfo instance for testing.
    ///
    /// Production code obtains commits from an [`Inspector`].
    pub(crate) fn new_for_test(oid: &str, summary: &str, author: &str) -> Self {
        Self {
            oid: oid.to_string(),
            short_oid: oid.chars().take(7).collect(),
            summary: summary.to_string(),
            message: format!("{summary}\n"),
            author: author.to_string(),
            author_email: format!("{}@example.com", author.to_lowercase()),
            date: 1_700_000_000,
        }
    }
}
