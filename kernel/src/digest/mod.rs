//! Canonical digests of result records.
//!
//! The canonical buffer is built by appending, per record and in the order
//! the caller supplies records:
//!
//! ```text
//! domain=<id> type=<category>\n
//! <average rendered>\n
//! <std. dev. rendered>\n
//! ```
//!
//! The buffer is order-sensitive: the caller's domain and category order is
//! part of the digest. Nothing here sorts.

pub mod canon;
pub mod hash;

use crate::record::ResultRecord;

/// A finished digest: the canonical text, or its SHA-512.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Digest {
    /// The canonical buffer itself.
    Raw(String),
    /// Lowercase hex SHA-512 of the canonical buffer's UTF-8 bytes.
    Sha512(String),
}

impl Digest {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Raw(s) | Self::Sha512(s) => s,
        }
    }

    #[must_use]
    pub fn is_hashed(&self) -> bool {
        matches!(self, Self::Sha512(_))
    }

    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Raw(s) | Self::Sha512(s) => s,
        }
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulates the canonical buffer one record at a time.
#[derive(Debug, Default)]
pub struct DigestBuilder {
    buf: String,
    records: usize,
}

impl DigestBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one labeled record.
    pub fn push(&mut self, record: &ResultRecord) {
        self.buf.push_str("domain=");
        self.buf.push_str(&record.domain_id.to_string());
        self.buf.push_str(" type=");
        self.buf.push_str(record.category.as_str());
        self.buf.push('\n');
        record.average().render_into(&mut self.buf);
        self.buf.push('\n');
        record.std_dev().render_into(&mut self.buf);
        self.buf.push('\n');
        self.records += 1;
    }

    /// Records appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// The buffer as built so far.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buf
    }

    /// Finish, optionally reducing the buffer to its SHA-512.
    #[must_use]
    pub fn finish(self, hash_output: bool) -> Digest {
        if hash_output {
            Digest::Sha512(hash::sha512_hex(self.buf.as_bytes()))
        } else {
            Digest::Raw(self.buf)
        }
    }
}

/// Digest a sequence of records in the given order.
#[must_use]
pub fn digest_records<'a>(
    records: impl IntoIterator<Item = &'a ResultRecord>,
    hash_output: bool,
) -> Digest {
    let mut builder = DigestBuilder::new();
    for record in records {
        builder.push(record);
    }
    builder.finish(hash_output)
}
