//! Todo list derivation from a resolved commit range.

use std::fmt;

use bstr::{BStr, ByteSlice};
use git_hash::ObjectId;
use git_history::{CommitMetadata, CommitRange};

use crate::entry::RebaseEntry;

/// Subject prefixes that `git rebase --autosquash` acts on.
const AUTOSQUASH_MARKERS: [&[u8]; 2] = [b"fixup!", b"squash!"];

/// Why a range cannot be turned into a todo list without asking git.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CantRebaseReason {
    /// A commit in the range has more than one parent.
    Merge,
    /// A commit subject starts with `fixup!` or `squash!`.
    FixupSquash,
    /// A commit's parent is not the commit before it (or the base).
    UnexpectedParent,
}

impl fmt::Display for CantRebaseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Merge => "merge commit in range",
            Self::FixupSquash => "fixup!/squash! commit in range",
            Self::UnexpectedParent => "range is not a linear chain from the base",
        })
    }
}

/// Log-based derivation refused the range.
///
/// `partial_entries` holds the picks produced before the offending commit;
/// they are diagnostics only and never a usable todo list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot rebase using log: {reason} ({commit})")]
pub struct CantRebaseUsingLog {
    pub reason: CantRebaseReason,
    pub commit: ObjectId,
    pub partial_entries: Vec<RebaseEntry>,
}

/// Whether `subject` carries an autosquash marker followed by whitespace.
pub fn is_autosquash_subject(subject: &BStr) -> bool {
    let subject: &[u8] = subject.as_ref();
    AUTOSQUASH_MARKERS.iter().any(|marker| {
        subject
            .strip_prefix(*marker)
            .and_then(|rest| rest.first())
            .is_some_and(u8::is_ascii_whitespace)
    })
}

/// Build the `pick` list for `range`, oldest first.
///
/// Every commit must have exactly one parent, that parent must be the
/// previous commit in the range (the base for the first one), and no subject
/// may carry an autosquash marker. Merges take precedence: a range with a
/// merge anywhere fails with `CantRebaseReason::Merge` even if an earlier
/// commit was already disqualified for another reason.
pub fn derive_entries(range: &CommitRange) -> Result<Vec<RebaseEntry>, CantRebaseUsingLog> {
    let mut entries = Vec::with_capacity(range.len());
    let mut refused: Option<(CantRebaseReason, ObjectId)> = None;
    let mut expected_parent = *range.base();

    for commit in range {
        if commit.is_merge() {
            return Err(CantRebaseUsingLog {
                reason: CantRebaseReason::Merge,
                commit: commit.id,
                partial_entries: entries,
            });
        }
        if refused.is_some() {
            continue;
        }
        let subject = commit.subject();
        match disqualify(commit, subject.as_bstr(), &expected_parent) {
            Some(reason) => refused = Some((reason, commit.id)),
            None => {
                entries.push(RebaseEntry::pick(commit.id, subject));
                expected_parent = commit.id;
            }
        }
    }

    match refused {
        Some((reason, commit)) => Err(CantRebaseUsingLog {
            reason,
            commit,
            partial_entries: entries,
        }),
        None => Ok(entries),
    }
}

fn disqualify(
    commit: &CommitMetadata,
    subject: &BStr,
    expected_parent: &ObjectId,
) -> Option<CantRebaseReason> {
    if commit.first_parent() != Some(expected_parent) {
        return Some(CantRebaseReason::UnexpectedParent);
    }
    if is_autosquash_subject(subject) {
        return Some(CantRebaseReason::FixupSquash);
    }
    None
}
