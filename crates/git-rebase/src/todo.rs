//! Todo list rendering and parsing.
//!
//! The format is the one `git rebase -i` writes into `git-rebase-todo`: one
//! `<command> <commit> <subject>` line per entry, with `#` comment lines and
//! blank lines ignored on read.

use bstr::{BStr, BString, ByteSlice};

use crate::action::RebaseAction;
use crate::entry::RebaseEntry;

#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: missing commit")]
    MissingCommit { line: usize },

    #[error("line {line}: '{value}' is not a commit id")]
    InvalidCommit { line: usize, value: String },
}

/// An ordered todo list ready to be written out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoList {
    pub entries: Vec<RebaseEntry>,
}

impl TodoList {
    pub fn from_entries(entries: Vec<RebaseEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render with full commit ids, one newline-terminated line per entry.
    pub fn render(&self) -> BString {
        self.render_abbrev(usize::MAX)
    }

    /// Render with commit ids cut to `abbrev` hex digits.
    pub fn render_abbrev(&self, abbrev: usize) -> BString {
        let mut out = BString::default();
        for entry in &self.entries {
            out.extend_from_slice(&entry.to_line(abbrev));
            out.push(b'\n');
        }
        out
    }

    /// Parse a todo file into its instruction lines.
    ///
    /// Commit ids are kept as written (usually abbreviated), so the result
    /// is compared with `TodoLine::matches` rather than converted back into
    /// entries.
    pub fn parse(input: impl AsRef<[u8]>) -> Result<Vec<TodoLine>, TodoError> {
        let mut lines = Vec::new();
        for (n, raw) in input.as_ref().split_str("\n").enumerate() {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let trimmed = raw.trim_start();
            if trimmed.is_empty() || trimmed.starts_with(b"#") || is_noop(trimmed) {
                continue;
            }
            lines.push(parse_line(n + 1, trimmed)?);
        }
        Ok(lines)
    }
}

/// git writes a lone `noop` when there is nothing to replay.
fn is_noop(line: &[u8]) -> bool {
    line.trim_end() == b"noop"
}

/// One parsed instruction from a todo file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoLine {
    pub action: RebaseAction,
    /// Commit id as written, possibly abbreviated.
    pub commit: String,
    pub subject: BString,
}

impl TodoLine {
    /// Whether this line names the same action, commit and subject as `entry`.
    pub fn matches(&self, entry: &RebaseEntry) -> bool {
        self.action == entry.action
            && entry.commit.starts_with_hex(&self.commit)
            && self.subject == entry.subject
    }
}

fn parse_line(line: usize, text: &[u8]) -> Result<TodoLine, TodoError> {
    let (command, rest) = split_word(text);
    let command = command.to_str_lossy();
    let action = RebaseAction::from_command(&command).ok_or_else(|| TodoError::UnknownCommand {
        line,
        command: command.to_string(),
    })?;

    let (commit, subject) = split_word(rest);
    if commit.is_empty() {
        return Err(TodoError::MissingCommit { line });
    }
    let commit = commit.to_str().ok().filter(|c| is_commit_token(c)).ok_or_else(|| {
        TodoError::InvalidCommit {
            line,
            value: commit.to_str_lossy().into_owned(),
        }
    })?;

    // Some git versions write `pick <id> # <subject>`.
    let subject = subject.strip_prefix(b"# ").unwrap_or(subject);
    Ok(TodoLine {
        action,
        commit: commit.to_string(),
        subject: BString::from(subject),
    })
}

/// Split off the first space-delimited word; the remainder loses exactly one
/// separating space so subject bytes stay intact.
fn split_word(text: &[u8]) -> (&BStr, &[u8]) {
    match text.find_byte(b' ') {
        Some(at) => (text[..at].as_bstr(), &text[at + 1..]),
        None => (text.as_bstr(), &text[text.len()..]),
    }
}

/// Longest hex id git can print (SHA-256).
const MAX_HEX_LEN: usize = 64;

fn is_commit_token(value: &str) -> bool {
    value.len() <= MAX_HEX_LEN && git_hash::hex::is_hex_prefix(value)
}
