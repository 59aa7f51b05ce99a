//! Range resolution and derivation against a history index.

use git_hash::ObjectId;
use git_history::{resolve_range_with, HistoryError, HistoryIndex, RepoRoot, WalkLimits};

use crate::derive::{derive_entries, CantRebaseReason, CantRebaseUsingLog};
use crate::entry::RebaseEntry;

#[derive(Debug, thiserror::Error)]
pub enum LogRebaseError {
    /// The base is not reachable from the root's HEAD within the walk limits.
    #[error("base commit {base} is not reachable from {tip}")]
    NotFound { base: ObjectId, tip: ObjectId },

    #[error(transparent)]
    CantRebase(#[from] CantRebaseUsingLog),

    #[error(transparent)]
    History(HistoryError),
}

impl From<HistoryError> for LogRebaseError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::NotFound { base, tip } => Self::NotFound { base, tip },
            other => Self::History(other),
        }
    }
}

impl LogRebaseError {
    /// Whether the caller should hand the request to `git rebase -i` instead.
    ///
    /// Only a refusal qualifies: an unreachable base or a broken index is
    /// reported as-is, because git would fail (or disagree) in the same way.
    pub fn should_fall_back(&self) -> bool {
        matches!(self, Self::CantRebase(_))
    }

    pub fn reason(&self) -> Option<CantRebaseReason> {
        match self {
            Self::CantRebase(err) => Some(err.reason),
            _ => None,
        }
    }
}

/// The todo entries `git rebase -i <base>` would produce for `root`.
pub fn entries_using_log<I>(
    root: &RepoRoot,
    index: &I,
    base: &ObjectId,
) -> Result<Vec<RebaseEntry>, LogRebaseError>
where
    I: HistoryIndex + ?Sized,
{
    entries_using_log_with(root, index, base, &WalkLimits::default())
}

pub fn entries_using_log_with<I>(
    root: &RepoRoot,
    index: &I,
    base: &ObjectId,
    limits: &WalkLimits,
) -> Result<Vec<RebaseEntry>, LogRebaseError>
where
    I: HistoryIndex + ?Sized,
{
    let range = resolve_range_with(root, index, base, limits)?;
    Ok(derive_entries(&range)?)
}
