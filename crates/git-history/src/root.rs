use std::fmt;
use std::path::{Path, PathBuf};

/// Identifies a repository by its working-tree root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoRoot(PathBuf);

impl RepoRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RepoRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0.display())
    }
}

impl From<&Path> for RepoRoot {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for RepoRoot {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}
