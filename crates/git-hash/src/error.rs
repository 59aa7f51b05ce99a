/// Errors produced while reading object ids.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("invalid hex character at position {position}: '{character}'")]
    InvalidHex { position: usize, character: char },

    #[error("invalid object id length: {actual} hex characters (expected 40 or 64)")]
    InvalidLength { actual: usize },

    #[error("invalid digest length: {actual} bytes (expected 20 or 32)")]
    InvalidDigestLength { actual: usize },
}
