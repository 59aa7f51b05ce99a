//! Loads history snapshots by reading `git log` output.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use bstr::{BString, ByteSlice};
use git_hash::ObjectId;

use crate::commit::{Author, CommitMetadata};
use crate::live::HistoryLoader;
use crate::root::RepoRoot;
use crate::snapshot::{HistorySnapshot, SnapshotBuilder};
use crate::HistoryError;

/// Fields per commit record: "<id> <parents...>", name, email, time, message.
const RECORD_FIELDS: usize = 5;
const LOG_FORMAT: &str = "--format=%H %P%x00%an%x00%ae%x00%at%x00%B";

/// A `HistoryLoader` backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCliLoader {
    git: PathBuf,
}

impl Default for GitCliLoader {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCliLoader {
    pub fn new(git: impl Into<PathBuf>) -> Self {
        Self { git: git.into() }
    }

    /// The git executable this loader runs.
    pub fn binary(&self) -> &Path {
        &self.git
    }

    /// Use `$GITR_GIT` when set, else `git` from `PATH`.
    pub fn from_env() -> Self {
        match std::env::var_os("GITR_GIT") {
            Some(git) if !git.is_empty() => Self::new(git),
            _ => Self::default(),
        }
    }

    fn git<I, S>(&self, root: &RepoRoot, args: I) -> Result<std::process::Output, HistoryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Ok(Command::new(&self.git)
            .args(args)
            .current_dir(root.path())
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()?)
    }

    fn git_checked(&self, root: &RepoRoot, args: &[&str]) -> Result<Vec<u8>, HistoryError> {
        let output = self.git(root, args)?;
        if !output.status.success() {
            return Err(HistoryError::Git {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    fn head(&self, root: &RepoRoot) -> Result<Option<ObjectId>, HistoryError> {
        // Fails loudly outside a repository; an unborn HEAD is not an error.
        self.git_checked(root, &["rev-parse", "--git-dir"])?;
        let output = self.git(root, ["rev-parse", "--verify", "--quiet", "HEAD^{commit}"])?;
        if !output.status.success() {
            return Ok(None);
        }
        let hex = output.stdout.trim().to_str().map_err(|_| {
            HistoryError::Malformed("HEAD is not valid UTF-8".into())
        })?;
        Ok(Some(ObjectId::from_hex(hex)?))
    }
}

impl HistoryLoader for GitCliLoader {
    fn load(&self, root: &RepoRoot) -> Result<HistorySnapshot, HistoryError> {
        let mut builder = SnapshotBuilder::new();
        let tip = self.head(root)?;
        builder.tip(root.clone(), tip);
        if tip.is_none() {
            return Ok(builder.build());
        }

        let log = self.git_checked(root, &["log", "--all", "-z", LOG_FORMAT])?;
        for commit in parse_log(&log)? {
            builder.insert(commit);
        }
        Ok(builder.build())
    }
}

/// Parse the NUL-separated output of `git log -z` with `LOG_FORMAT`.
fn parse_log(out: &[u8]) -> Result<Vec<CommitMetadata>, HistoryError> {
    let out = out.strip_suffix(b"\0").unwrap_or(out);
    if out.is_empty() {
        return Ok(Vec::new());
    }

    let fields: Vec<&[u8]> = out.split(|&b| b == 0).collect();
    if fields.len() % RECORD_FIELDS != 0 {
        return Err(HistoryError::Malformed(format!(
            "{} fields is not a whole number of commit records",
            fields.len()
        )));
    }

    fields
        .chunks_exact(RECORD_FIELDS)
        .map(parse_record)
        .collect()
}

fn parse_record(record: &[&[u8]]) -> Result<CommitMetadata, HistoryError> {
    let header = record[0]
        .to_str()
        .map_err(|_| HistoryError::Malformed("commit header is not valid UTF-8".into()))?;
    let mut ids = header.split(' ').filter(|s| !s.is_empty());
    let id = ids
        .next()
        .ok_or_else(|| HistoryError::Malformed("empty commit header".into()))?;
    let id = ObjectId::from_hex(id)?;
    let parents = ids.map(ObjectId::from_hex).collect::<Result<Vec<_>, _>>()?;

    let time = record[3]
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .ok_or_else(|| HistoryError::Malformed(format!("bad author time for {id}")))?;

    Ok(CommitMetadata {
        id,
        parents,
        author: Author {
            name: BString::from(record[1]),
            email: BString::from(record[2]),
            time,
        },
        message: BString::from(record[4]),
    })
}
