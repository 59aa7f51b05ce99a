//! Object identity for gitr.
//!
//! Provides `ObjectId`, the content-addressed name of a commit, together with
//! the hex codec used to read ids from git output and to abbreviate them the
//! way `git rebase -i` does in its todo list.

mod error;
pub mod hex;
mod oid;

pub use error::HashError;
pub use oid::ObjectId;
