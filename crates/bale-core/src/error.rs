//! Error types for archive building and checksum operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while building archives or writing checksum
/// manifests.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source path does not exist or cannot be stat-ed.
    #[error("source path not found: {path}")]
    SourceNotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// Filesystem object is neither a regular file nor a directory.
    #[error("unsupported file mode: {path} is not a regular file or directory")]
    UnsupportedFileMode {
        /// The offending path.
        path: PathBuf,
    },

    /// Requested digest algorithm is not supported.
    #[error("hash algorithm `{name}` is not supported")]
    UnsupportedAlgorithm {
        /// The algorithm name as given by the caller.
        name: String,
    },

    /// Parent directories of the destination could not be created.
    #[error("cannot create parent directories for {path}: {source}")]
    DestinationParent {
        /// The parent directory that could not be created.
        path: PathBuf,
        /// The underlying filesystem error.
        source: std::io::Error,
    },

    /// Entry path cannot be represented in the archive wire format.
    #[error("entry path is not representable in the archive: {path}")]
    InvalidEntryPath {
        /// The filesystem path with the unrepresentable name.
        path: PathBuf,
    },
}

impl ArchiveError {
    /// Returns `true` if this error was caused by the shape of the input
    /// (missing source, unsupported kind or algorithm) rather than by a
    /// filesystem failure.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. }
                | Self::UnsupportedFileMode { .. }
                | Self::UnsupportedAlgorithm { .. }
        )
    }

    /// Returns the path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::SourceNotFound { path }
            | Self::UnsupportedFileMode { path }
            | Self::DestinationParent { path, .. }
            | Self::InvalidEntryPath { path } => Some(path),
            Self::Io(_) | Self::UnsupportedAlgorithm { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ArchiveError::SourceNotFound {
            path: PathBuf::from("/missing/dir"),
        };
        assert!(err.to_string().contains("source path not found"));
        assert!(err.to_string().contains("/missing/dir"));
    }

    #[test]
    fn test_unsupported_algorithm_display() {
        let err = ArchiveError::UnsupportedAlgorithm {
            name: "md55".to_string(),
        };
        assert_eq!(err.to_string(), "hash algorithm `md55` is not supported");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ArchiveError = io_err.into();
        assert!(matches!(err, ArchiveError::Io(_)));
    }

    #[test]
    fn test_is_usage_error() {
        let err = ArchiveError::SourceNotFound {
            path: PathBuf::from("x"),
        };
        assert!(err.is_usage_error());

        let err = ArchiveError::UnsupportedAlgorithm {
            name: "crc64".into(),
        };
        assert!(err.is_usage_error());

        let err: ArchiveError = std::io::Error::other("disk full").into();
        assert!(!err.is_usage_error());
    }

    #[test]
    fn test_path_accessor() {
        let err = ArchiveError::UnsupportedFileMode {
            path: PathBuf::from("/dev/null"),
        };
        assert_eq!(err.path(), Some(&PathBuf::from("/dev/null")));

        let err = ArchiveError::UnsupportedAlgorithm { name: "md55".into() };
        assert_eq!(err.path(), None);
    }
}
