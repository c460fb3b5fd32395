//! SHA-512 hex digests.
//!
//! **Exactly one place computes digest hashes.** The hash covers the raw
//! bytes only: no domain prefix, no length framing. A reference digest
//! recorded by any other SHA-512 tool over the same text must match.

use sha2::{Digest, Sha512};

/// Length in hex characters of a [`sha512_hex`] result.
pub const SHA512_HEX_LEN: usize = 128;

/// Lowercase hex SHA-512 of `data`.
#[must_use]
pub fn sha512_hex(data: &[u8]) -> String {
    let mut hasher = Sha512::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Lowercase hex SHA-512 over several byte slices, fed in order.
///
/// Equivalent to hashing their concatenation.
#[must_use]
pub fn sha512_hex_parts<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> String {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

/// Whether `s` looks like a [`sha512_hex`] output.
#[must_use]
pub fn is_sha512_hex(s: &str) -> bool {
    s.len() == SHA512_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
