//! ContentKey: the SHA-1 digest of a record's locator followed by its namespace.
//!
//! The key is the file name of a record inside its namespace directory, so two
//! records with the same `(locator, namespace)` always land on the same file.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::record::Record;

/// Length of a rendered key: 20 bytes of SHA-1 as lowercase hex.
pub const KEY_LEN: usize = 40;

/// A content key - 160 bits (20 bytes, 40 hex chars) of SHA-1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentKey(String);

/// Errors that can occur when parsing a content key.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid key length: expected {KEY_LEN} hex chars, got {0}")]
    InvalidLength(usize),

    #[error("invalid hex character in key")]
    InvalidHex,
}

impl ContentKey {
    /// Compute the key for a record.
    pub fn for_record(record: &Record) -> Self {
        Self::from_parts(&record.locator, &record.namespace)
    }

    /// Compute the key for a `(locator, namespace)` pair.
    ///
    /// The two fields are hashed back to back with no separator.
    pub fn from_parts(locator: &str, namespace: &str) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(locator.as_bytes());
        hasher.update(namespace.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Create from an existing key string (validates format).
    pub fn from_str_checked(s: &str) -> Result<Self, KeyError> {
        if s.len() != KEY_LEN {
            return Err(KeyError::InvalidLength(s.len()));
        }
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(KeyError::InvalidHex);
        }
        Ok(Self(s.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_checked(s)
    }
}

impl AsRef<str> for ContentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
