//! Checksum computation and manifest writing.
//!
//! Manifests use the coreutils `*sum` line format (`<hex>  <label>`), one
//! manifest file per algorithm. The manifest path is derived from a template
//! in which every literal `CHECKSUM` token is replaced by the algorithm name.

use crate::error::ArchiveError;
use crate::error::Result;
use md5::Md5;
use sha1::Sha1;
use sha2::Digest;
use sha2::Sha256;
use sha2::Sha512;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

/// Token in a manifest destination template that is replaced by the
/// algorithm name.
pub const CHECKSUM_TOKEN: &str = "CHECKSUM";

const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumAlgorithm {
    /// MD5 (128-bit). Weak; provided for legacy manifest compatibility.
    Md5,
    /// SHA-1 (160-bit). Weak; provided for legacy manifest compatibility.
    Sha1,
    /// SHA-256 (256-bit).
    Sha256,
    /// SHA-512 (512-bit).
    Sha512,
}

impl ChecksumAlgorithm {
    /// All supported algorithms, in manifest-name order.
    pub const ALL: [Self; 4] = [Self::Md5, Self::Sha1, Self::Sha256, Self::Sha512];

    /// Canonical lowercase name, as used in manifest file names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            _ => Err(ArchiveError::UnsupportedAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

/// Computes the lowercase hex digest of everything `reader` yields.
///
/// # Examples
///
/// ```
/// use bale_core::checksum::ChecksumAlgorithm;
/// use bale_core::checksum::compute_checksum;
///
/// let digest = compute_checksum(&b"abc"[..], ChecksumAlgorithm::Md5)?;
/// assert_eq!(digest, "900150983cd24fb0d6963f7d28e17f72");
/// # Ok::<(), bale_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns an error if reading fails.
pub fn compute_checksum<R: Read>(reader: R, algorithm: ChecksumAlgorithm) -> Result<String> {
    match algorithm {
        ChecksumAlgorithm::Md5 => digest_reader::<Md5, R>(reader),
        ChecksumAlgorithm::Sha1 => digest_reader::<Sha1, R>(reader),
        ChecksumAlgorithm::Sha256 => digest_reader::<Sha256, R>(reader),
        ChecksumAlgorithm::Sha512 => digest_reader::<Sha512, R>(reader),
    }
}

fn digest_reader<D: Digest, R: Read>(mut reader: R) -> Result<String> {
    let mut hasher = D::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
    loop {
        let bytes = reader.read(&mut buffer)?;
        if bytes == 0 {
            break;
        }
        hasher.update(&buffer[..bytes]);
    }
    Ok(hex_encode(hasher.finalize().as_slice()))
}

fn hex_encode(bytes: &[u8]) -> String {
    use fmt::Write as _;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing to a String cannot fail.
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Derives the manifest path for `algorithm` by replacing every literal
/// `CHECKSUM` token in the template with the algorithm name.
#[must_use]
pub fn manifest_path(template: &Path, algorithm: ChecksumAlgorithm) -> PathBuf {
    let rendered = template
        .to_string_lossy()
        .replace(CHECKSUM_TOKEN, algorithm.name());
    PathBuf::from(rendered)
}

/// Writes one checksum manifest per algorithm covering all of `files`.
///
/// Algorithm names are validated up front; an invalid name fails the whole
/// call before any manifest is written. Manifests are then written in
/// algorithm order, one `<hex>  <label>` line per file. The label is the
/// file's basename when `use_basename` is set, otherwise the path as given.
/// Returns the manifest paths in algorithm order. With no input files there
/// is nothing to digest, so no manifest is created.
///
/// # Errors
///
/// Returns [`ArchiveError::UnsupportedAlgorithm`] for an unknown algorithm
/// name, or an I/O error if hashing or writing fails. A failure while
/// processing a later algorithm leaves earlier manifests on disk.
pub fn write_checksum_files(
    files: &[PathBuf],
    algorithms: &[String],
    template: &Path,
    use_basename: bool,
) -> Result<Vec<PathBuf>> {
    let algorithms = algorithms
        .iter()
        .map(|name| name.parse())
        .collect::<Result<Vec<ChecksumAlgorithm>>>()?;

    if files.is_empty() {
        return Ok(Vec::new());
    }

    let mut written = Vec::with_capacity(algorithms.len());
    for algorithm in algorithms {
        let dest = manifest_path(template, algorithm);

        let mut lines = String::new();
        for file in files {
            let digest = compute_checksum(File::open(file)?, algorithm)?;
            let label = entry_label(file, use_basename);
            lines.push_str(&digest);
            lines.push_str("  ");
            lines.push_str(&label);
            lines.push('\n');
        }

        let mut manifest = File::create(&dest)?;
        manifest.write_all(lines.as_bytes())?;
        written.push(dest);
    }

    Ok(written)
}

fn entry_label(path: &Path, use_basename: bool) -> String {
    if use_basename
        && let Some(name) = path.file_name()
    {
        return name.to_string_lossy().into_owned();
    }
    path.to_string_lossy().into_owned()
}
