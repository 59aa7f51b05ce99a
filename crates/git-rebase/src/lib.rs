//! Interactive rebase todo lists derived from history.
//!
//! `derive_entries` turns a resolved commit range into the `pick` list that
//! `git rebase -i <base>` would present, refusing with a typed
//! `CantRebaseUsingLog` when the range holds something it cannot reproduce
//! faithfully (merges, autosquash markers, a broken chain). `entries_using_log`
//! runs range resolution and derivation together against a history index.
//! `TodoList` renders and parses the instruction-file format.

mod action;
mod derive;
mod entry;
mod log;
mod todo;

pub use action::RebaseAction;
pub use derive::{derive_entries, is_autosquash_subject, CantRebaseReason, CantRebaseUsingLog};
pub use entry::RebaseEntry;
pub use log::{entries_using_log, entries_using_log_with, LogRebaseError};
pub use todo::{TodoError, TodoLine, TodoList};
