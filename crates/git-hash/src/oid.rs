use std::fmt;
use std::str::FromStr;

use crate::hex;
use crate::HashError;

/// The content-addressed name of a git object.
///
/// Both repository formats are supported; the variant is chosen from the
/// length of the input when parsing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectId {
    Sha1([u8; 20]),
    Sha256([u8; 32]),
}

impl ObjectId {
    /// Default abbreviation length used by `git rebase -i` todo lists.
    pub const DEFAULT_ABBREV: usize = 7;

    /// Build an id from a raw digest (20 bytes for SHA-1, 32 for SHA-256).
    pub fn from_digest(digest: &[u8]) -> Result<Self, HashError> {
        match digest.len() {
            20 => {
                let mut arr = [0u8; 20];
                arr.copy_from_slice(digest);
                Ok(Self::Sha1(arr))
            }
            32 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(digest);
                Ok(Self::Sha256(arr))
            }
            actual => Err(HashError::InvalidDigestLength { actual }),
        }
    }

    /// Parse a full 40- or 64-character hex id.
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        match s.len() {
            40 => {
                let mut arr = [0u8; 20];
                hex::decode_into(s, &mut arr)?;
                Ok(Self::Sha1(arr))
            }
            64 => {
                let mut arr = [0u8; 32];
                hex::decode_into(s, &mut arr)?;
                Ok(Self::Sha256(arr))
            }
            actual => Err(HashError::InvalidLength { actual }),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Sha1(b) => b,
            Self::Sha256(b) => b,
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// The first `len` hex digits (clamped to the full length).
    pub fn short_hex(&self, len: usize) -> String {
        let mut full = self.to_hex();
        full.truncate(len);
        full
    }

    /// Whether an abbreviated id, as printed by git, names this object.
    ///
    /// The comparison is case-insensitive; an empty or non-hex prefix never
    /// matches.
    pub fn starts_with_hex(&self, prefix: &str) -> bool {
        hex::is_hex_prefix(prefix) && self.to_hex().starts_with(&prefix.to_ascii_lowercase())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex(8))
    }
}

impl FromStr for ObjectId {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
