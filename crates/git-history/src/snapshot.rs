use std::collections::HashMap;

use bstr::BString;
use git_hash::ObjectId;
use sha1::{Digest, Sha1};

use crate::commit::{Author, CommitMetadata};
use crate::root::RepoRoot;
use crate::HistoryError;

/// Read access to commit metadata.
///
/// This is the whole surface the graph view needs from a history store.
pub trait HistoryIndex {
    /// The commit HEAD pointed at when the data was captured, or `None` for
    /// an unborn branch.
    fn tip(&self, root: &RepoRoot) -> Result<Option<ObjectId>, HistoryError>;

    /// Metadata for a single commit.
    fn commit(&self, id: &ObjectId) -> Result<&CommitMetadata, HistoryError>;
}

/// An immutable, fully loaded view of commit history.
#[derive(Debug, Clone, Default)]
pub struct HistorySnapshot {
    commits: HashMap<ObjectId, CommitMetadata>,
    tips: HashMap<RepoRoot, Option<ObjectId>>,
}

impl HistorySnapshot {
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.commits.contains_key(id)
    }

    /// Roots this snapshot carries a tip for.
    pub fn roots(&self) -> impl Iterator<Item = &RepoRoot> {
        self.tips.keys()
    }
}

impl HistoryIndex for HistorySnapshot {
    fn tip(&self, root: &RepoRoot) -> Result<Option<ObjectId>, HistoryError> {
        self.tips
            .get(root)
            .copied()
            .ok_or_else(|| HistoryError::UnknownRoot(root.clone()))
    }

    fn commit(&self, id: &ObjectId) -> Result<&CommitMetadata, HistoryError> {
        self.commits.get(id).ok_or(HistoryError::MissingCommit(*id))
    }
}

/// Incrementally assembles a `HistorySnapshot`.
///
/// Besides accepting loaded metadata, the builder can mint commits with
/// synthetic content-addressed ids, which is how tests and benches describe
/// history without a repository on disk.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    commits: HashMap<ObjectId, CommitMetadata>,
    tips: HashMap<RepoRoot, Option<ObjectId>>,
    clock: i64,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add loaded metadata. A later insert for the same id replaces the
    /// earlier one.
    pub fn insert(&mut self, commit: CommitMetadata) -> &mut Self {
        self.commits.insert(commit.id, commit);
        self
    }

    /// Record where HEAD points for `root`.
    pub fn tip(&mut self, root: RepoRoot, tip: Option<ObjectId>) -> &mut Self {
        self.tips.insert(root, tip);
        self
    }

    /// Create a commit with the given parents and message and return its id.
    ///
    /// The id is the SHA-1 of a canonical commit text, so it depends on the
    /// parents, the message and a per-builder clock; two calls never collide.
    pub fn commit(&mut self, parents: &[ObjectId], message: impl Into<BString>) -> ObjectId {
        self.clock += 1;
        let message = message.into();
        let author = Author {
            name: "Test Author".into(),
            email: "test@example.com".into(),
            time: 1_234_567_890 + self.clock,
        };

        let mut text = Vec::with_capacity(message.len() + 64 * (parents.len() + 1));
        for parent in parents {
            text.extend_from_slice(b"parent ");
            text.extend_from_slice(parent.to_hex().as_bytes());
            text.push(b'\n');
        }
        text.extend_from_slice(format!("author <{}> {} +0000\n\n", author.email, author.time).as_bytes());
        text.extend_from_slice(&message);

        let mut hasher = Sha1::new();
        hasher.update(format!("commit {}\0", text.len()).as_bytes());
        hasher.update(&text);
        let digest: [u8; 20] = hasher.finalize().into();
        let id = ObjectId::Sha1(digest);

        self.insert(CommitMetadata {
            id,
            parents: parents.to_vec(),
            author,
            message,
        });
        id
    }

    pub fn build(self) -> HistorySnapshot {
        HistorySnapshot {
            commits: self.commits,
            tips: self.tips,
        }
    }
}
