//! Archive packaging library with checksum manifests.
//!
//! `bale-core` packages a file or directory tree into a Tar/Gzip or Zip
//! archive with deterministic entry ordering and optional base-path
//! stripping, and can emit checksum manifest files (md5, sha1, sha256,
//! sha512) for the produced archive.
//!
//! # Examples
//!
//! ```no_run
//! use bale_core::create_tarball_with_checksum;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let outcome = create_tarball_with_checksum(
//!     None,
//!     Path::new("./pkg"),
//!     "./.tmp/pkg.tar.gz",
//!     "sha256",
//!     Path::new("./.tmp/pkg.CHECKSUM.tar.txt"),
//! )?;
//! println!("Archived {} entries", outcome.report.entries_added());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod checksum;
pub mod error;
pub mod report;
pub mod tarball;
pub mod walk;
pub mod zipball;

// Re-export main API types
pub use api::ArchiveFormat;
pub use api::ArchiveOutcome;
pub use api::create_archive;
pub use api::create_tarball;
pub use api::create_tarball_with_checksum;
pub use api::create_zipball;
pub use api::create_zipball_with_checksum;
pub use api::resolve_destination;
pub use checksum::ChecksumAlgorithm;
pub use checksum::compute_checksum;
pub use checksum::write_checksum_files;
pub use error::ArchiveError;
pub use error::Result;
pub use report::BuildReport;
