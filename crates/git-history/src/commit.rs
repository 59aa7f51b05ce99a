use bstr::{BStr, BString, ByteSlice};
use git_hash::ObjectId;

/// Author identity recorded on a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: BString,
    pub email: BString,
    /// Seconds since the epoch.
    pub time: i64,
}

/// Read-only metadata for one commit in the history index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMetadata {
    pub id: ObjectId,
    /// Parent ids in order (empty for a root commit).
    pub parents: Vec<ObjectId>,
    pub author: Author,
    /// Full message as stored: subject, optional blank line, body.
    pub message: BString,
}

impl CommitMetadata {
    /// The subject as `git log --format=%s` and the rebase todo show it.
    ///
    /// The subject is the first paragraph of the message. A one-line
    /// paragraph comes back byte for byte, trailing whitespace included. A
    /// wrapped paragraph has each line's trailing whitespace dropped and
    /// the lines joined with single spaces. `#` characters and long lines
    /// are never touched.
    pub fn subject(&self) -> BString {
        let msg: &[u8] = self.message.as_ref();
        let mut lines = msg.lines().take_while(|line| !line.trim().is_empty());
        let Some(first) = lines.next() else {
            return BString::default();
        };
        let Some(second) = lines.next() else {
            return BString::from(first);
        };

        let mut subject = BString::from(first.trim_end());
        for line in std::iter::once(second).chain(lines) {
            subject.push(b' ');
            subject.extend_from_slice(line.trim_end());
        }
        subject
    }

    /// Everything after the first blank line of the message.
    pub fn body(&self) -> Option<&BStr> {
        let msg: &[u8] = self.message.as_ref();
        msg.find(b"\n\n").map(|pos| msg[pos + 2..].as_bstr())
    }

    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}
