//! Shared test harness for git-cli integration tests.
//!
//! Provides process runners and repo setup utilities. Environment variables
//! are fully pinned for deterministic output across machines and CI runners.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

// ──────────────────────────── Types ────────────────────────────

/// Captured output from running a command.
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

// ──────────────────────────── Binary Discovery ────────────────────────────

/// Discover the path to the compiled `gitr` binary.
pub fn gitr_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_gitr"))
}

// ──────────────────────────── Process Runners ────────────────────────────

/// Apply the full set of pinned environment variables to a `Command`.
fn pin_env(cmd: &mut Command, dir: &Path) {
    cmd.env("GIT_AUTHOR_NAME", "Test Author")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_AUTHOR_DATE", "1234567890 +0000")
        .env("GIT_COMMITTER_NAME", "Test Committer")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_DATE", "1234567890 +0000")
        .env("TZ", "UTC")
        .env("LC_ALL", "C")
        .env("LANG", "C")
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("HOME", dir)
        .env_remove("GITR_LOG")
        .env_remove("GITR_GIT");
}

fn run(mut cmd: Command, dir: &Path, args: &[&str]) -> CommandResult {
    cmd.args(args).current_dir(dir);
    pin_env(&mut cmd, dir);
    let output = cmd.output().expect("failed to run command");
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}

/// Run C git in `dir` with the given arguments. Returns a `CommandResult`.
pub fn git(dir: &Path, args: &[&str]) -> CommandResult {
    run(Command::new("git"), dir, args)
}

/// Run the gitr binary in `dir` with the given arguments. Returns a `CommandResult`.
pub fn gitr(dir: &Path, args: &[&str]) -> CommandResult {
    run(Command::new(gitr_bin()), dir, args)
}

/// Run gitr with extra environment variables.
pub fn gitr_env(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> CommandResult {
    let mut cmd = Command::new(gitr_bin());
    cmd.args(args).current_dir(dir);
    pin_env(&mut cmd, dir);
    for (key, value) in env {
        cmd.env(key, value);
    }
    let output = cmd.output().expect("failed to run gitr");
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}

/// Run C git with a specific date override (for multi-commit scenarios).
pub fn git_with_date(dir: &Path, args: &[&str], epoch: &str) -> CommandResult {
    let mut cmd = Command::new("git");
    cmd.args(args).current_dir(dir);
    pin_env(&mut cmd, dir);
    cmd.env("GIT_AUTHOR_DATE", epoch)
        .env("GIT_COMMITTER_DATE", epoch);
    let output = cmd.output().expect("failed to run git");
    let result = CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    };
    assert_eq!(result.exit_code, 0, "git {args:?} failed: {}", result.stderr);
    result
}

/// Generate a deterministic date string. Returns `"(1234567890 + counter) +0000"`.
pub fn next_date(counter: &mut u64) -> String {
    *counter += 1;
    format!("{} +0000", 1234567890u64 + *counter)
}

/// Full id of `rev`.
pub fn rev_parse(dir: &Path, rev: &str) -> String {
    let result = git(dir, &["rev-parse", rev]);
    assert_eq!(result.exit_code, 0, "rev-parse {rev} failed: {}", result.stderr);
    result.stdout.trim().to_string()
}

// ──────────────────────────── Repo Setup Helpers ────────────────────────────

/// Initialize an empty repo with `git init -b main` and basic config. No commits.
pub fn setup_empty_repo(dir: &Path) {
    git(dir, &["init", "-q", "-b", "main"]);
    git(dir, &["config", "user.name", "Test Author"]);
    git(dir, &["config", "user.email", "test@example.com"]);
}

/// Create a repo with `n` sequential commits, each adding a file.
/// Uses deterministic content and incrementing dates.
pub fn setup_linear_history(dir: &Path, n: usize) {
    setup_empty_repo(dir);
    let mut counter = 0u64;
    for i in 0..n {
        let filename = format!("file_{}.txt", i);
        let content = format!("content for commit {}\n", i);
        std::fs::write(dir.join(&filename), &content).unwrap();
        let date = next_date(&mut counter);
        git_with_date(dir, &["add", &filename], &date);
        let msg = format!("commit {}", i);
        git_with_date(dir, &["commit", "-q", "-m", &msg], &date);
    }
}

/// Create a repo with main (3 commits) and feature (2 commits diverging from
/// commit 2), then merge feature into main with a merge commit.
pub fn setup_merged_history(dir: &Path) {
    setup_empty_repo(dir);
    let mut counter = 0u64;

    for i in 0..3 {
        let filename = format!("main_{}.txt", i);
        std::fs::write(dir.join(&filename), format!("main content {}\n", i)).unwrap();
        let date = next_date(&mut counter);
        git_with_date(dir, &["add", &filename], &date);
        git_with_date(dir, &["commit", "-q", "-m", &format!("main commit {}", i)], &date);
    }

    git_with_date(dir, &["checkout", "-q", "-b", "feature", "HEAD~1"], &next_date(&mut counter));
    for i in 0..2 {
        let filename = format!("feature_{}.txt", i);
        std::fs::write(dir.join(&filename), format!("feature content {}\n", i)).unwrap();
        let date = next_date(&mut counter);
        git_with_date(dir, &["add", &filename], &date);
        git_with_date(dir, &["commit", "-q", "-m", &format!("feature commit {}", i)], &date);
    }

    let date = next_date(&mut counter);
    git_with_date(dir, &["checkout", "-q", "main"], &date);
    git_with_date(dir, &["merge", "-q", "--no-ff", "-m", "merge feature", "feature"], &date);
}

/// Add one commit with the given message on top of HEAD.
pub fn commit_message(dir: &Path, file: &str, message: &str) {
    let path = dir.join(file);
    let mut content = std::fs::read_to_string(&path).unwrap_or_default();
    content.push_str(message);
    content.push('\n');
    std::fs::write(&path, content).unwrap();
    let mut counter = 100u64;
    let date = next_date(&mut counter);
    git_with_date(dir, &["add", file], &date);
    git_with_date(dir, &["commit", "-q", "-m", message], &date);
}
