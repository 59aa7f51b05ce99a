//! Commit history index and graph view.
//!
//! A history index holds read-only commit metadata (parents, message, author)
//! for one or more repositories. `HistorySnapshot` is the immutable in-memory
//! form; `LiveHistoryIndex` refreshes snapshots in the background and notifies
//! subscribers when a full data pack for a repository is available.
//! `resolve_range` is the graph view on top: it turns a rebase base into the
//! ordered list of commits between that base and the branch tip.

mod commit;
mod live;
mod loader;
mod range;
mod root;
mod snapshot;

pub use commit::{Author, CommitMetadata};
pub use live::{HistoryLoader, LiveHistoryIndex, RefreshEvent, RefreshOptions};
pub use loader::GitCliLoader;
pub use range::{resolve_range, resolve_range_with, CommitRange, WalkLimits};
pub use root::RepoRoot;
pub use snapshot::{HistoryIndex, HistorySnapshot, SnapshotBuilder};

use std::time::Duration;

use git_hash::ObjectId;

/// Errors produced by the history index and the graph view.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("no history loaded for {0}")]
    UnknownRoot(RepoRoot),

    #[error("{0} has no HEAD commit")]
    NoHead(RepoRoot),

    #[error("commit not found in history index: {0}")]
    MissingCommit(ObjectId),

    #[error("base commit {base} is not reachable from {tip}")]
    NotFound { base: ObjectId, tip: ObjectId },

    #[error("timed out after {timeout:?} waiting for history of {root}")]
    RefreshTimeout { root: RepoRoot, timeout: Duration },

    #[error("history refresh failed for {root}: {message}")]
    RefreshFailed { root: RepoRoot, message: String },

    #[error("{command} failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error("malformed git log output: {0}")]
    Malformed(String),

    #[error(transparent)]
    Hash(#[from] git_hash::HashError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
