//! Tar/Gzip archive building.
//!
//! Entries are written in walk order: header first, then the full file
//! payload, with directories contributing a header only. The tar trailer
//! blocks are flushed before the gzip footer, in that order.

use crate::error::Result;
use crate::report::BuildReport;
use crate::walk::EntryKind;
use crate::walk::SourceWalker;
use crate::walk::WalkedEntry;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tar::Builder;
use tar::Header;

/// Builds a gzip-compressed tar stream from `source` into `writer`.
///
/// When `base` is given, entry names are relative to it; otherwise they are
/// relative to the source's parent directory. The whole stream is buffered
/// through the caller's writer; nothing is retained on error.
///
/// # Examples
///
/// ```no_run
/// use bale_core::tarball::write_tarball;
/// use std::path::Path;
///
/// let mut buf = Vec::new();
/// let report = write_tarball(Path::new("src"), None, &mut buf)?;
/// println!("{} entries, {} bytes", report.entries_added(), buf.len());
/// # Ok::<(), bale_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns an error if the source does not exist, an entry has an
/// unsupported file mode, or any read/write fails. The first error aborts
/// the build; no attempt is made to repair a partial stream.
pub fn write_tarball<W: Write>(
    source: &Path,
    base: Option<&Path>,
    writer: W,
) -> Result<BuildReport> {
    let walker = SourceWalker::new(source, base)?;

    let counting = CountingWriter::new(writer);
    let encoder = GzEncoder::new(counting, Compression::default());
    let mut builder = Builder::new(encoder);
    let mut report = BuildReport::default();
    let start = std::time::Instant::now();

    for entry in walker.walk() {
        let entry = entry?;
        match entry.kind {
            EntryKind::File => append_file(&mut builder, &entry, &mut report)?,
            EntryKind::Dir => append_dir(&mut builder, &entry, &mut report)?,
        }
    }

    // Tar trailer blocks first, then the gzip footer.
    builder.finish()?;
    let encoder = builder.into_inner()?;
    let mut counting = encoder.finish()?;
    counting.flush()?;

    report.bytes_compressed = counting.total_bytes();
    report.duration = start.elapsed();

    Ok(report)
}

/// Appends a regular file: header, then the full payload.
fn append_file<W: Write>(
    builder: &mut Builder<W>,
    entry: &WalkedEntry,
    report: &mut BuildReport,
) -> Result<()> {
    let mut file = File::open(&entry.path)?;
    let metadata = file.metadata()?;
    let size = metadata.len();

    let mut header = Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(size);
    fill_header_metadata(&mut header, &metadata);
    header.set_cksum();

    builder.append_data(&mut header, &entry.name, &mut file)?;

    report.files_added += 1;
    report.bytes_written += size;

    Ok(())
}

/// Appends a directory entry: header only, zero-length payload.
fn append_dir<W: Write>(
    builder: &mut Builder<W>,
    entry: &WalkedEntry,
    report: &mut BuildReport,
) -> Result<()> {
    let mut header = Header::new_gnu();
    header.set_entry_type(tar::EntryType::Directory);
    header.set_size(0);
    fill_header_metadata(&mut header, &entry.metadata);
    header.set_cksum();

    builder.append_data(&mut header, &entry.name, std::io::empty())?;

    report.directories_added += 1;

    Ok(())
}

#[cfg(unix)]
fn fill_header_metadata(header: &mut Header, metadata: &std::fs::Metadata) {
    use std::os::unix::fs::MetadataExt;
    header.set_mode(metadata.mode());
    header.set_uid(u64::from(metadata.uid()));
    header.set_gid(u64::from(metadata.gid()));
    // mtime can predate the epoch; tar stores it unsigned.
    #[allow(clippy::cast_sign_loss)]
    let mtime = metadata.mtime().max(0) as u64;
    header.set_mtime(mtime);
}

#[cfg(not(unix))]
fn fill_header_metadata(header: &mut Header, metadata: &std::fs::Metadata) {
    let mode = if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    };
    header.set_mode(mode);

    if let Ok(modified) = metadata.modified()
        && let Ok(duration) = modified.duration_since(std::time::UNIX_EPOCH)
    {
        header.set_mtime(duration.as_secs());
    }
}

/// Write wrapper that tracks the compressed byte count.
struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
}

impl<W> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    fn total_bytes(&self) -> u64 {
        self.bytes_written
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let bytes = self.inner.write(buf)?;
        self.bytes_written += bytes as u64;
        Ok(bytes)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
