use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use git_history::{GitCliLoader, LiveHistoryIndex, RefreshOptions, WalkLimits};
use git_rebase::{entries_using_log_with, LogRebaseError, TodoList};

use super::{open_root, resolve_commit};
use crate::Cli;

/// Shortest abbreviation git accepts for `--abbrev`.
const MIN_ABBREV: usize = 4;

#[derive(Args)]
pub struct RebaseTodoArgs {
    /// Commit to rebase onto (exclusive)
    base: String,

    /// Abbreviate commit ids to <n> hex digits (full ids when omitted)
    #[arg(long, value_name = "n")]
    abbrev: Option<usize>,

    /// Milliseconds to wait for the history index to load
    #[arg(long = "timeout-ms", value_name = "ms", default_value_t = default_timeout_ms())]
    timeout_ms: u64,

    /// Give up if the base is not found within <n> commits of HEAD
    #[arg(long = "max-commits", value_name = "n", default_value_t = WalkLimits::default().max_commits)]
    max_commits: usize,
}

fn default_timeout_ms() -> u64 {
    RefreshOptions::default().timeout.as_millis() as u64
}

pub fn run(args: &RebaseTodoArgs, _cli: &Cli) -> Result<i32> {
    let git = GitCliLoader::from_env();
    let root = open_root(&git)?;
    let base = resolve_commit(&git, &root, &args.base)?;

    let index = LiveHistoryIndex::new(git);
    let options = RefreshOptions {
        timeout: Duration::from_millis(args.timeout_ms),
    };
    let snapshot = index.refresh_and_wait(&root, &options)?;

    let limits = WalkLimits {
        max_commits: args.max_commits,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match entries_using_log_with(&root, &*snapshot, &base, &limits) {
        Ok(entries) => {
            tracing::debug!(root = %root, base = %base, entries = entries.len(), "derived todo list");
            let list = TodoList::from_entries(entries);
            let text = match args.abbrev {
                Some(n) => list.render_abbrev(n.max(MIN_ABBREV)),
                None => list.render(),
            };
            out.write_all(&text)?;
            out.flush()?;
            Ok(0)
        }
        Err(LogRebaseError::CantRebase(refusal)) => {
            tracing::info!(
                root = %root,
                reason = %refusal.reason,
                commit = %refusal.commit,
                partial_entries = refusal.partial_entries.len(),
                "falling back to git rebase -i"
            );
            eprintln!("{refusal}");
            Ok(1)
        }
        Err(other) => Err(other.into()),
    }
}
