pub mod rebase_todo;

use std::path::PathBuf;
use std::process::Command;

use anyhow::{anyhow, bail, Context, Result};
use clap::Subcommand;
use git_hash::ObjectId;
use git_history::{GitCliLoader, RepoRoot};

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the todo list `git rebase -i <base>` would start with
    RebaseTodo(rebase_todo::RebaseTodoArgs),
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::RebaseTodo(args) => rebase_todo::run(args, &cli),
    }
}

/// Locate the working tree root of the current repository.
pub fn open_root(git: &GitCliLoader) -> Result<RepoRoot> {
    let toplevel = rev_parse(git, &["--show-toplevel"])?;
    Ok(RepoRoot::new(PathBuf::from(toplevel)))
}

/// Resolve a revision to a commit id the way `git rev-parse` does.
pub fn resolve_commit(git: &GitCliLoader, root: &RepoRoot, rev: &str) -> Result<ObjectId> {
    let peeled = format!("{rev}^{{commit}}");
    let hex = rev_parse_in(git, Some(root), &["--verify", "--quiet", peeled.as_str()]).map_err(|e| {
        tracing::debug!(rev, error = %e, "revision did not resolve");
        anyhow!("invalid upstream '{rev}'")
    })?;
    Ok(ObjectId::from_hex(&hex)?)
}

fn rev_parse(git: &GitCliLoader, args: &[&str]) -> Result<String> {
    rev_parse_in(git, None, args)
}

fn rev_parse_in(git: &GitCliLoader, root: Option<&RepoRoot>, args: &[&str]) -> Result<String> {
    let mut cmd = Command::new(git.binary());
    cmd.arg("rev-parse").args(args);
    if let Some(root) = root {
        cmd.current_dir(root.path());
    }
    let output = cmd
        .output()
        .with_context(|| format!("cannot run '{}'", git.binary().display()))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            bail!("git rev-parse {} failed", args.join(" "));
        }
        bail!("{}", stderr.strip_prefix("fatal: ").unwrap_or(stderr));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
