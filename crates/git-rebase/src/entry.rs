use std::fmt;

use bstr::{BString, ByteSlice};
use git_hash::ObjectId;

use crate::action::RebaseAction;

/// One line of an interactive rebase todo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebaseEntry {
    pub action: RebaseAction,
    pub commit: ObjectId,
    /// Subject exactly as it should appear after the commit id.
    pub subject: BString,
}

impl RebaseEntry {
    pub fn new(action: RebaseAction, commit: ObjectId, subject: impl Into<BString>) -> Self {
        Self {
            action,
            commit,
            subject: subject.into(),
        }
    }

    pub fn pick(commit: ObjectId, subject: impl Into<BString>) -> Self {
        Self::new(RebaseAction::Pick, commit, subject)
    }

    /// Render as `<action> <id> <subject>` with the id cut to `abbrev`
    /// hex digits (no newline).
    pub fn to_line(&self, abbrev: usize) -> BString {
        let mut line = BString::from(format!("{} {}", self.action, self.commit.short_hex(abbrev)));
        if !self.subject.is_empty() {
            line.push(b' ');
            line.extend_from_slice(&self.subject);
        }
        line
    }
}

impl fmt::Display for RebaseEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.action, self.commit, self.subject.as_bstr())
    }
}
