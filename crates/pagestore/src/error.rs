//! Errors returned by store operations.
//!
//! Every failure carries the [`Operation`] it came from and, where a file was
//! involved, the path. The lower-level cause stays reachable through
//! [`std::error::Error::source`].

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::record::CodecError;

/// The store operation an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Save,
    PickRandom,
    Remove,
    IsExist,
    List,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self {
            Operation::Save => "cannot save page",
            Operation::PickRandom => "cannot pick random page",
            Operation::Remove => "cannot remove page",
            Operation::IsExist => "cannot check if page exists",
            Operation::List => "cannot list pages",
        };
        f.write_str(prefix)
    }
}

/// Coarse classification for callers that branch on failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The namespace exists but holds no records.
    NoSavedPages,
    /// The file or directory an operation needed does not exist.
    NotFound,
    /// Any other filesystem failure.
    Io,
    /// A record could not be encoded or a file could not be decoded.
    Codec,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no saved pages in namespace {namespace:?}")]
    NoSavedPages { namespace: String },

    #[error("{op}: {}: {source}", path.display())]
    Io {
        op: Operation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{op}: cannot decode {}: {source}", path.display())]
    Decode {
        op: Operation,
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("{op}: cannot encode record: {source}")]
    Encode {
        op: Operation,
        #[source]
        source: CodecError,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub(crate) fn io(op: Operation, path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NoSavedPages { .. } => ErrorKind::NoSavedPages,
            StoreError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                ErrorKind::NotFound
            }
            StoreError::Io { .. } => ErrorKind::Io,
            StoreError::Decode { .. } | StoreError::Encode { .. } => ErrorKind::Codec,
        }
    }

    pub fn op(&self) -> Option<Operation> {
        match self {
            StoreError::NoSavedPages { .. } => Some(Operation::PickRandom),
            StoreError::Io { op, .. }
            | StoreError::Decode { op, .. }
            | StoreError::Encode { op, .. } => Some(*op),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            StoreError::Io { path, .. } | StoreError::Decode { path, .. } => Some(path),
            StoreError::NoSavedPages { .. } | StoreError::Encode { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_no_saved_pages(&self) -> bool {
        self.kind() == ErrorKind::NoSavedPages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_not_found_kind() {
        let err = StoreError::io(
            Operation::Remove,
            "/tmp/pages/bob/abc",
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.is_not_found());
        assert_eq!(err.op(), Some(Operation::Remove));
        assert_eq!(err.path(), Some(Path::new("/tmp/pages/bob/abc")));
    }

    #[test]
    fn test_io_other_kind() {
        let err = StoreError::io(
            Operation::IsExist,
            "/tmp/x",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_message_has_operation_prefix_and_path() {
        let err = StoreError::io(
            Operation::Save,
            "/tmp/pages/bob",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("cannot save page: /tmp/pages/bob"), "{msg}");
    }

    #[test]
    fn test_source_is_preserved() {
        let err = StoreError::Decode {
            op: Operation::PickRandom,
            path: PathBuf::from("/tmp/pages/bob/abc"),
            source: CodecError::BadMagic,
        };
        let source = err.source().expect("should have a source");
        assert!(source.downcast_ref::<CodecError>().is_some());
        assert_eq!(err.kind(), ErrorKind::Codec);
    }

    #[test]
    fn test_no_saved_pages_is_distinct() {
        let err = StoreError::NoSavedPages {
            namespace: "bob".into(),
        };
        assert!(err.is_no_saved_pages());
        assert!(!err.is_not_found());
        assert_eq!(err.path(), None);
    }
}
