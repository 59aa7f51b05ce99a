//! Graph view: the commits a rebase onto `base` would replay.

use std::collections::{HashMap, HashSet, VecDeque};

use git_hash::ObjectId;

use crate::commit::CommitMetadata;
use crate::root::RepoRoot;
use crate::snapshot::HistoryIndex;
use crate::HistoryError;

/// Bounds on how much history a single range resolution may visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkLimits {
    /// Maximum number of commits read while searching for the base.
    pub max_commits: usize,
}

impl Default for WalkLimits {
    fn default() -> Self {
        Self {
            max_commits: 100_000,
        }
    }
}

/// Commits between an exclusive base and an inclusive tip, oldest first.
///
/// A range built by `resolve_range` holds exactly `base..tip`. It is not
/// guaranteed to be a linear chain; consumers that need one must check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRange {
    base: ObjectId,
    tip: ObjectId,
    commits: Vec<CommitMetadata>,
}

impl CommitRange {
    pub fn new(base: ObjectId, tip: ObjectId, commits: Vec<CommitMetadata>) -> Self {
        Self { base, tip, commits }
    }

    pub fn empty(base: ObjectId) -> Self {
        Self::new(base, base, Vec::new())
    }

    pub fn base(&self) -> &ObjectId {
        &self.base
    }

    pub fn tip(&self) -> &ObjectId {
        &self.tip
    }

    pub fn commits(&self) -> &[CommitMetadata] {
        &self.commits
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CommitMetadata> {
        self.commits.iter()
    }
}

impl<'a> IntoIterator for &'a CommitRange {
    type Item = &'a CommitMetadata;
    type IntoIter = std::slice::Iter<'a, CommitMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.commits.iter()
    }
}

/// Resolve `base..HEAD` for `root` with default limits.
pub fn resolve_range<I>(
    root: &RepoRoot,
    index: &I,
    base: &ObjectId,
) -> Result<CommitRange, HistoryError>
where
    I: HistoryIndex + ?Sized,
{
    resolve_range_with(root, index, base, &WalkLimits::default())
}

/// Resolve `base..HEAD` for `root`.
///
/// Walks parent links breadth-first from the tip, without descending past
/// `base`. If the base is not met within `limits.max_commits` reads the
/// result is `HistoryError::NotFound`. The bound also applies once the base
/// has been met: side history still queued past it counts toward the limit,
/// and a walk cut short is reported as `NotFound` rather than returned as a
/// partial range. When the walk crossed a merge, commits
/// that are also ancestors of the base are removed so the result matches
/// `git rev-list base..HEAD`.
pub fn resolve_range_with<I>(
    root: &RepoRoot,
    index: &I,
    base: &ObjectId,
    limits: &WalkLimits,
) -> Result<CommitRange, HistoryError>
where
    I: HistoryIndex + ?Sized,
{
    let tip = index
        .tip(root)?
        .ok_or_else(|| HistoryError::NoHead(root.clone()))?;

    if tip == *base {
        return Ok(CommitRange::empty(*base));
    }

    let mut visited: Vec<&CommitMetadata> = Vec::new();
    let mut seen: HashSet<ObjectId> = HashSet::new();
    let mut queue: VecDeque<ObjectId> = VecDeque::new();
    let mut found_base = false;
    let mut crossed_merge = false;

    seen.insert(tip);
    queue.push_back(tip);
    while let Some(id) = queue.pop_front() {
        if id == *base {
            found_base = true;
            continue;
        }
        // A truncated walk may be missing side commits; never return it.
        if visited.len() >= limits.max_commits {
            return Err(HistoryError::NotFound { base: *base, tip });
        }
        let commit = index.commit(&id)?;
        crossed_merge |= commit.is_merge();
        visited.push(commit);
        for parent in &commit.parents {
            if seen.insert(*parent) {
                queue.push_back(*parent);
            }
        }
    }

    if !found_base {
        return Err(HistoryError::NotFound { base: *base, tip });
    }

    if crossed_merge {
        let hidden = ancestors(index, base, &tip, limits)?;
        visited.retain(|c| !hidden.contains(&c.id));
    }

    let commits = oldest_first(&visited).into_iter().cloned().collect();
    Ok(CommitRange::new(*base, tip, commits))
}

/// `base` and all of its ancestors; more than the walk limit is `NotFound`.
fn ancestors<I>(
    index: &I,
    base: &ObjectId,
    tip: &ObjectId,
    limits: &WalkLimits,
) -> Result<HashSet<ObjectId>, HistoryError>
where
    I: HistoryIndex + ?Sized,
{
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(*base);
    queue.push_back(*base);
    while let Some(id) = queue.pop_front() {
        if seen.len() > limits.max_commits {
            return Err(HistoryError::NotFound {
                base: *base,
                tip: *tip,
            });
        }
        let commit = index.commit(&id)?;
        for parent in &commit.parents {
            if seen.insert(*parent) {
                queue.push_back(*parent);
            }
        }
    }
    Ok(seen)
}

/// Topological order with every parent before its children.
///
/// `commits` is in discovery order from the tip; among commits that are
/// ready at the same time, the one discovered last (the deepest) goes first.
fn oldest_first<'a>(commits: &[&'a CommitMetadata]) -> Vec<&'a CommitMetadata> {
    let position: HashMap<ObjectId, usize> = commits
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i))
        .collect();

    let mut pending_parents: Vec<usize> = vec![0; commits.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); commits.len()];
    for (i, commit) in commits.iter().enumerate() {
        for parent in &commit.parents {
            if let Some(&p) = position.get(parent) {
                pending_parents[i] += 1;
                children[p].push(i);
            }
        }
    }

    let mut ready: Vec<usize> = (0..commits.len())
        .filter(|&i| pending_parents[i] == 0)
        .collect();
    let mut order = Vec::with_capacity(commits.len());
    // `ready` is kept sorted ascending, so `pop` yields the deepest commit.
    while let Some(i) = ready.pop() {
        order.push(commits[i]);
        for &child in &children[i] {
            pending_parents[child] -= 1;
            if pending_parents[child] == 0 {
                let at = ready.partition_point(|&r| r < child);
                ready.insert(at, child);
            }
        }
    }
    order
}
