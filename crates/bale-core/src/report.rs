//! Archive build statistics.

use std::time::Duration;

/// Statistics of a single archive build.
///
/// # Examples
///
/// ```
/// use bale_core::BuildReport;
///
/// let mut report = BuildReport::default();
/// report.bytes_written = 1024;
/// report.bytes_compressed = 512;
/// assert_eq!(report.compression_ratio(), 2.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Number of regular files added to the archive.
    pub files_added: usize,

    /// Number of directory entries added to the archive.
    pub directories_added: usize,

    /// Total payload bytes written (uncompressed).
    pub bytes_written: u64,

    /// Size of the produced archive stream (compressed).
    pub bytes_compressed: u64,

    /// Wall-clock duration of the build.
    pub duration: Duration,
}

impl BuildReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries written.
    #[must_use]
    pub const fn entries_added(&self) -> usize {
        self.files_added + self.directories_added
    }

    /// Compression ratio (uncompressed / compressed), or 0.0 when either
    /// side is zero.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed == 0 || self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.bytes_compressed as f64
    }

    /// Space saved by compression as a percentage, clamped to `0..=100`.
    #[must_use]
    pub fn compression_percentage(&self) -> f64 {
        if self.bytes_written == 0 {
            return 0.0;
        }
        let saved = 100.0 - (self.bytes_compressed as f64 / self.bytes_written as f64) * 100.0;
        saved.clamp(0.0, 100.0)
    }
}
