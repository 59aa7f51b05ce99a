//! Shared test harness for git-rebase integration tests.
//!
//! Builds repositories with C git, loads them through the history index and
//! captures the todo list `git rebase -i` itself would open in the editor.
//! Environment variables are pinned for deterministic ids.

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use git_hash::ObjectId;
use git_history::{GitCliLoader, HistoryLoader, HistorySnapshot, RepoRoot};
use git_rebase::{TodoLine, TodoList};

// ──────────────────────────── Types ────────────────────────────

/// Captured output from running a command.
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

// ──────────────────────────── Process Runners ────────────────────────────

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
        .env("GIT_EDITOR", "true")
        .env_remove("GIT_SEQUENCE_EDITOR");
}

/// Run C git in `dir` with the given arguments.
pub fn git(dir: &Path, args: &[&str]) -> CommandResult {
    let mut cmd = Command::new("git");
    cmd.args(args).current_dir(dir);
    pin_env(&mut cmd, dir);
    let output = cmd.output().expect("failed to run git");
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}

/// Run C git and panic unless it succeeds.
pub fn git_ok(dir: &Path, args: &[&str]) -> String {
    let result = git(dir, args);
    assert_eq!(
        result.exit_code, 0,
        "git {:?} failed (exit {}):\nstdout: {}\nstderr: {}",
        args, result.exit_code, result.stdout, result.stderr,
    );
    result.stdout
}

/// Resolve a revision to an id with `git rev-parse`.
pub fn rev_parse(dir: &Path, rev: &str) -> ObjectId {
    ObjectId::from_hex(git_ok(dir, &["rev-parse", rev]).trim()).unwrap()
}

/// Generate a deterministic date string. Returns `"(1234567890 + counter) +0000"`.
pub fn next_date(counter: &mut u64) -> String {
    *counter += 1;
    format!("{} +0000", 1234567890u64 + *counter)
}

// ──────────────────────────── Repo Setup Helpers ────────────────────────────

/// Initialize an empty repo with `git init -b main` and basic config. No commits.
pub fn setup_empty_repo(dir: &Path) {
    git_ok(dir, &["init", "-q", "-b", "main"]);
    git_ok(dir, &["config", "user.name", "Test Author"]);
    git_ok(dir, &["config", "user.email", "test@example.com"]);
    git_ok(dir, &["config", "rebase.autoSquash", "false"]);
}

/// Commit a change to `file` with the given `-m` paragraphs.
pub fn commit(dir: &Path, file: &str, paragraphs: &[&str]) -> ObjectId {
    commit_with(dir, file, paragraphs, &[])
}

/// Like `commit`, with extra `git commit` flags (e.g. `--cleanup=verbatim`).
pub fn commit_with(dir: &Path, file: &str, paragraphs: &[&str], flags: &[&str]) -> ObjectId {
    let path = dir.join(file);
    let mut content = std::fs::read_to_string(&path).unwrap_or_default();
    content.push_str(&format!("{}\n", paragraphs.first().copied().unwrap_or("")));
    std::fs::write(&path, content).unwrap();
    git_ok(dir, &["add", file]);

    let mut args = vec!["commit", "-q"];
    args.extend_from_slice(flags);
    for paragraph in paragraphs {
        args.push("-m");
        args.push(*paragraph);
    }
    git_ok(dir, &args);
    rev_parse(dir, "HEAD")
}

/// Commit a change to `file` with the message read from a file (`git commit -F`),
/// which keeps line breaks inside the first paragraph.
pub fn commit_from_file(dir: &Path, file: &str, message: &str) -> ObjectId {
    let path = dir.join(file);
    let mut content = std::fs::read_to_string(&path).unwrap_or_default();
    content.push_str(message);
    std::fs::write(&path, content).unwrap();
    git_ok(dir, &["add", file]);

    let message_path = dir.join(".git").join("TEST_COMMIT_MSG");
    std::fs::write(&message_path, message).unwrap();
    git_ok(dir, &["commit", "-q", "-F", message_path.to_str().unwrap()]);
    rev_parse(dir, "HEAD")
}

/// Create a repo with `n` sequential commits, each modifying its own file.
pub fn setup_linear_history(dir: &Path, n: usize) {
    setup_empty_repo(dir);
    for i in 0..n {
        let subject = format!("commit {i}");
        commit(dir, &format!("file_{i}.txt"), &[subject.as_str()]);
    }
}

// ──────────────────────────── History Index ────────────────────────────

/// Load the repository's history the way the application does.
pub fn load(dir: &Path) -> (RepoRoot, HistorySnapshot) {
    let root = RepoRoot::new(dir);
    let snapshot = GitCliLoader::default().load(&root).unwrap();
    (root, snapshot)
}

// ──────────────────────────── Rebase Oracle ────────────────────────────

/// The todo list `git rebase -i <base>` hands to the sequence editor.
///
/// A capture script copies the file and then empties it, so git stops with
/// "nothing to do" and leaves the repository untouched.
pub fn capture_git_todo(dir: &Path, base: &ObjectId) -> Vec<TodoLine> {
    let scratch = tempfile::tempdir().unwrap();
    let capture = scratch.path().join("todo");
    let script = scratch.path().join("capture-todo.sh");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\ncp \"$1\" '{}'\n: > \"$1\"\n",
            capture.display()
        ),
    )
    .unwrap();
    make_executable(&script);

    let base_hex = base.to_hex();
    let mut cmd = Command::new("git");
    cmd.args([
        "-c",
        "rebase.autoSquash=false",
        "-c",
        "rebase.abbreviateCommands=false",
        "rebase",
        "-i",
        "--no-autosquash",
        base_hex.as_str(),
    ])
    .current_dir(dir);
    pin_env(&mut cmd, dir);
    cmd.env("GIT_SEQUENCE_EDITOR", &script);
    let output = cmd.output().expect("failed to run git rebase");

    let todo = std::fs::read(&capture).unwrap_or_else(|_| {
        panic!(
            "sequence editor was not invoked:\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        )
    });
    TodoList::parse(todo).unwrap()
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

// ──────────────────────────── Assertion Helpers ────────────────────────────

/// Assert that derived entries and git's todo lines agree one to one.
pub fn assert_todo_eq(git_lines: &[TodoLine], entries: &[git_rebase::RebaseEntry]) {
    if git_lines.len() != entries.len() {
        panic!(
            "Entry count mismatch:\n  git:  {}\n  ours: {}\n\ngit: {:#?}\nours: {:#?}",
            git_lines.len(),
            entries.len(),
            git_lines,
            entries,
        );
    }
    for (i, (line, entry)) in git_lines.iter().zip(entries).enumerate() {
        if !line.matches(entry) {
            panic!("Entry {i} mismatch:\n  git:  {line:?}\n  ours: {entry:?}");
        }
    }
}
