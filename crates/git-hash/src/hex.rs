use crate::HashError;

const DIGITS: &[u8; 16] = b"0123456789abcdef";

fn nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Lowercase hex rendering of `bytes`.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(DIGITS[(b >> 4) as usize] as char);
        out.push(DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

/// Decode `hex` into `buf`, which must be exactly half as long as `hex`.
pub fn decode_into(hex: &str, buf: &mut [u8]) -> Result<(), HashError> {
    let raw = hex.as_bytes();
    if raw.len() != buf.len() * 2 {
        return Err(HashError::InvalidLength { actual: raw.len() });
    }
    for (i, pair) in raw.chunks_exact(2).enumerate() {
        let hi = nibble(pair[0]).ok_or(HashError::InvalidHex {
            position: i * 2,
            character: pair[0] as char,
        })?;
        let lo = nibble(pair[1]).ok_or(HashError::InvalidHex {
            position: i * 2 + 1,
            character: pair[1] as char,
        })?;
        buf[i] = (hi << 4) | lo;
    }
    Ok(())
}

/// True if every character of `s` is a hex digit (any case). Odd lengths are
/// allowed: abbreviated ids need not end on a byte boundary.
pub fn is_hex_prefix(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| nibble(b).is_some())
}
