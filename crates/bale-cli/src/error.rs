//! Error conversion utilities for CLI.
//!
//! Converts bale-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use bale_core::ArchiveError;
use std::path::Path;

/// Converts `ArchiveError` to a user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError, source: &Path) -> anyhow::Error {
    match err {
        ArchiveError::SourceNotFound { path } => {
            anyhow!(
                "Source path not found: {}\n\
                 HINT: Check the path, or pass --base-path if it is relative to another directory.",
                path.display()
            )
        }
        ArchiveError::UnsupportedFileMode { path } => {
            anyhow!(
                "Cannot archive '{}': {} is not a regular file or directory\n\
                 HINT: Symlinks, sockets, and device nodes cannot be packaged.",
                source.display(),
                path.display()
            )
        }
        ArchiveError::UnsupportedAlgorithm { name } => {
            anyhow!(
                "Unknown checksum algorithm: {name}\n\
                 HINT: Supported algorithms: md5, sha1, sha256, sha512."
            )
        }
        ArchiveError::DestinationParent { path, source: io } => {
            anyhow!(
                "Cannot create output directory {}: {io}\n\
                 HINT: Check permissions on the destination path.",
                path.display()
            )
        }
        ArchiveError::InvalidEntryPath { path } => {
            anyhow!(
                "Entry name cannot be represented in the archive: {}\n\
                 HINT: Rename the file to a valid UTF-8 name.",
                path.display()
            )
        }
        ArchiveError::Io(io_err) => {
            anyhow!("I/O error while packaging '{}': {io_err}", source.display())
        }
    }
}

/// Adds context to a core result about archive operations
pub fn add_archive_context<T>(
    result: Result<T, ArchiveError>,
    source: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, source))
}
