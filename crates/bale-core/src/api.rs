//! High-level archive creation API.
//!
//! These functions tie the walker, the format builders, and the checksum
//! writer together: resolve the destination path, build the archive into an
//! in-memory buffer, and only write the destination file once the build has
//! fully succeeded. A failed build therefore never leaves a partial archive
//! on disk.

use crate::checksum::write_checksum_files;
use crate::error::ArchiveError;
use crate::error::Result;
use crate::report::BuildReport;
use crate::tarball::write_tarball;
use crate::zipball::write_zipball;
use std::io::Cursor;
use std::path::Path;
use std::path::PathBuf;

/// Supported output archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// Gzip-compressed tar stream (`.tar.gz`).
    TarGz,
    /// Zip archive (`.zip`).
    Zip,
}

impl ArchiveFormat {
    /// Canonical file extension, without a leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }
}

/// Result of a successful archive creation.
#[derive(Debug)]
pub struct ArchiveOutcome {
    /// Resolved path of the written archive.
    pub path: PathBuf,

    /// Build statistics.
    pub report: BuildReport,

    /// Path of the checksum manifest, when one was requested.
    pub checksum: Option<PathBuf>,
}

/// Resolves the destination path for an archive of `source`.
///
/// A blank destination falls back to the source's basename plus the format
/// extension, in the current directory. A destination without the canonical
/// suffix gets it appended.
#[must_use]
pub fn resolve_destination(source: &Path, dest: &str, format: ArchiveFormat) -> PathBuf {
    let dest = dest.trim();
    let suffix = format!(".{}", format.extension());

    if dest.is_empty() {
        let basename = source
            .file_name()
            .map_or_else(|| "archive".to_string(), |n| n.to_string_lossy().into_owned());
        return PathBuf::from(format!("{basename}{suffix}"));
    }

    if dest.ends_with(&suffix) {
        PathBuf::from(dest)
    } else {
        PathBuf::from(format!("{dest}{suffix}"))
    }
}

/// Creates a Tar/Gzip archive of `source` at `dest`.
///
/// # Examples
///
/// ```no_run
/// use bale_core::create_tarball;
/// use std::path::Path;
///
/// let outcome = create_tarball(None, Path::new("./pkg"), "./out/pkg.tar.gz")?;
/// println!("wrote {}", outcome.path.display());
/// # Ok::<(), bale_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns an error if the source is missing, contains an unsupported
/// filesystem object, or the destination cannot be written.
pub fn create_tarball(base: Option<&Path>, source: &Path, dest: &str) -> Result<ArchiveOutcome> {
    create_archive(base, source, dest, ArchiveFormat::TarGz)
}

/// Creates a Zip archive of `source` at `dest`.
///
/// # Errors
///
/// Same failure modes as [`create_tarball`].
pub fn create_zipball(base: Option<&Path>, source: &Path, dest: &str) -> Result<ArchiveOutcome> {
    create_archive(base, source, dest, ArchiveFormat::Zip)
}

/// Creates a Tar/Gzip archive and a checksum manifest for it.
///
/// The manifest path is derived from `checksum_dest` by substituting the
/// `CHECKSUM` token with the algorithm name; the manifest line labels the
/// archive by basename.
///
/// # Errors
///
/// Same failure modes as [`create_tarball`], plus
/// [`ArchiveError::UnsupportedAlgorithm`] for an unknown algorithm name.
pub fn create_tarball_with_checksum(
    base: Option<&Path>,
    source: &Path,
    dest: &str,
    algorithm: &str,
    checksum_dest: &Path,
) -> Result<ArchiveOutcome> {
    let outcome = create_archive(base, source, dest, ArchiveFormat::TarGz)?;
    attach_checksum(outcome, algorithm, checksum_dest)
}

/// Creates a Zip archive and a checksum manifest for it.
///
/// # Errors
///
/// Same failure modes as [`create_tarball_with_checksum`].
pub fn create_zipball_with_checksum(
    base: Option<&Path>,
    source: &Path,
    dest: &str,
    algorithm: &str,
    checksum_dest: &Path,
) -> Result<ArchiveOutcome> {
    let outcome = create_archive(base, source, dest, ArchiveFormat::Zip)?;
    attach_checksum(outcome, algorithm, checksum_dest)
}

/// Builds the archive into memory, then writes the destination file.
pub fn create_archive(
    base: Option<&Path>,
    source: &Path,
    dest: &str,
    format: ArchiveFormat,
) -> Result<ArchiveOutcome> {
    let path = resolve_destination(source, dest, format);

    let (buffer, mut report) = match format {
        ArchiveFormat::TarGz => {
            let mut buffer = Vec::new();
            let report = write_tarball(source, base, &mut buffer)?;
            (buffer, report)
        }
        ArchiveFormat::Zip => {
            let mut cursor = Cursor::new(Vec::new());
            let report = write_zipball(source, base, &mut cursor)?;
            (cursor.into_inner(), report)
        }
    };
    report.bytes_compressed = buffer.len() as u64;

    write_destination(&path, &buffer)?;

    Ok(ArchiveOutcome {
        path,
        report,
        checksum: None,
    })
}

fn attach_checksum(
    mut outcome: ArchiveOutcome,
    algorithm: &str,
    checksum_dest: &Path,
) -> Result<ArchiveOutcome> {
    let written = write_checksum_files(
        std::slice::from_ref(&outcome.path),
        std::slice::from_ref(&algorithm.to_string()),
        checksum_dest,
        true,
    )?;
    outcome.checksum = written.into_iter().next();
    Ok(outcome)
}

fn write_destination(path: &Path, buffer: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| ArchiveError::DestinationParent {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, buffer)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o777))?;
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_destination_blank_uses_basename() {
        let path = resolve_destination(Path::new("./some/pkg"), "", ArchiveFormat::TarGz);
        assert_eq!(path, PathBuf::from("pkg.tar.gz"));

        let path = resolve_destination(Path::new("./some/pkg"), "   ", ArchiveFormat::Zip);
        assert_eq!(path, PathBuf::from("pkg.zip"));
    }

    #[test]
    fn test_resolve_destination_appends_suffix() {
        let path = resolve_destination(Path::new("pkg"), "out/release", ArchiveFormat::TarGz);
        assert_eq!(path, PathBuf::from("out/release.tar.gz"));
    }

    #[test]
    fn test_resolve_destination_keeps_full_suffix() {
        let path = resolve_destination(Path::new("pkg"), "out/release.tar.gz", ArchiveFormat::TarGz);
        assert_eq!(path, PathBuf::from("out/release.tar.gz"));

        let path = resolve_destination(Path::new("pkg"), "out/release.zip", ArchiveFormat::Zip);
        assert_eq!(path, PathBuf::from("out/release.zip"));
    }

    #[test]
    fn test_resolve_destination_partial_suffix() {
        // ".gz" alone is not the canonical tarball suffix.
        let path = resolve_destination(Path::new("pkg"), "out/release.gz", ArchiveFormat::TarGz);
        assert_eq!(path, PathBuf::from("out/release.gz.tar.gz"));
    }

    #[test]
    fn test_format_extensions() {
        assert_eq!(ArchiveFormat::TarGz.extension(), "tar.gz");
        assert_eq!(ArchiveFormat::Zip.extension(), "zip");
    }
}
