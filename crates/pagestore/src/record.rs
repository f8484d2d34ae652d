//! Record: the unit persisted by the store, and its on-disk encoding.
//!
//! Each record file is a small framed bincode document:
//!
//! ```text
//! +------+---------+------------------------------+
//! | PGR\0| version | bincode(Record)              |
//! | 4 B  | 1 B     | fixint, length-prefixed strs |
//! +------+---------+------------------------------+
//! ```
//!
//! The header lets a reader tell a record file from an unrelated file dropped
//! into a namespace directory before trying to decode it.

use std::io;

use bincode::Options;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::key::ContentKey;

/// Leading bytes of every record file.
pub const MAGIC: [u8; 4] = *b"PGR\0";

/// Current encoding version.
pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = MAGIC.len() + 1;

/// Upper bound on the decoded body, so a corrupt length prefix cannot
/// trigger a huge allocation.
const MAX_BODY_LEN: u64 = 16 * 1024 * 1024;

/// A saved page: a locator (usually a URL) owned by a namespace (usually a user name).
///
/// Two records are equal when both fields are equal; that pair is also what
/// the [`ContentKey`] is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub locator: String,
    pub namespace: String,
}

/// Errors produced while encoding or decoding a record file.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("record data too short: {0} bytes")]
    TooShort(usize),

    #[error("not a record file (bad magic)")]
    BadMagic,

    #[error("unsupported record format version {0}")]
    UnsupportedVersion(u8),

    #[error("record body is truncated")]
    Truncated,

    #[error("{0} unexpected bytes after record body")]
    TrailingBytes(usize),

    #[error("malformed record body: {0}")]
    Body(#[from] bincode::Error),
}

impl Record {
    pub fn new(locator: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            namespace: namespace.into(),
        }
    }

    /// The content key naming this record's file.
    pub fn key(&self) -> ContentKey {
        ContentKey::for_record(self)
    }

    /// Encode into the on-disk representation.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let body = body_options().serialize(self)?;
        let mut buf = Vec::with_capacity(HEADER_LEN + body.len());
        buf.extend_from_slice(&MAGIC);
        buf.push(FORMAT_VERSION);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Decode from the on-disk representation.
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        if data.len() < HEADER_LEN {
            return Err(CodecError::TooShort(data.len()));
        }
        let (header, body) = data.split_at(HEADER_LEN);
        if header[..MAGIC.len()] != MAGIC {
            return Err(CodecError::BadMagic);
        }
        let version = header[MAGIC.len()];
        if version != FORMAT_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }

        let mut rest = body;
        let record: Record = body_options()
            .deserialize_from(&mut rest)
            .map_err(|e| {
                let eof = matches!(
                    &*e,
                    bincode::ErrorKind::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof
                );
                if eof {
                    CodecError::Truncated
                } else {
                    CodecError::Body(e)
                }
            })?;
        if !rest.is_empty() {
            return Err(CodecError::TrailingBytes(rest.len()));
        }
        Ok(record)
    }
}

fn body_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_BODY_LEN)
}
