//! Zip archive building.
//!
//! Regular files are Deflate-compressed; directory entries are Stored with
//! a trailing slash, matching what common extractors expect.

use crate::error::Result;
use crate::report::BuildReport;
use crate::walk::EntryKind;
use crate::walk::SourceWalker;
use crate::walk::WalkedEntry;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Builds a zip archive from `source` into `writer`.
///
/// Entry names follow the same rules as the tarball builder: base-relative
/// when `base` is given, otherwise relative to the source's parent. The
/// writer must be seekable because the zip central directory is written at
/// the end of the stream.
///
/// # Errors
///
/// Returns an error if the source does not exist, an entry has an
/// unsupported file mode, or any read/write fails.
pub fn write_zipball<W: Write + Seek>(
    source: &Path,
    base: Option<&Path>,
    writer: W,
) -> Result<BuildReport> {
    let walker = SourceWalker::new(source, base)?;

    let mut zip = ZipWriter::new(writer);
    let mut report = BuildReport::default();
    let start = std::time::Instant::now();

    for entry in walker.walk() {
        let entry = entry?;
        match entry.kind {
            EntryKind::File => append_file(&mut zip, &entry, &mut report)?,
            EntryKind::Dir => append_dir(&mut zip, &entry, &mut report)?,
        }
    }

    let mut writer = zip.finish().map_err(std::io::Error::other)?;
    writer.flush()?;

    // The central directory is the last thing written, so the position is
    // the full archive size.
    report.bytes_compressed = writer.stream_position()?;
    report.duration = start.elapsed();

    Ok(report)
}

fn append_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    entry: &WalkedEntry,
    report: &mut BuildReport,
) -> Result<()> {
    let options = entry_options(entry).compression_method(CompressionMethod::Deflated);
    zip.start_file(&entry.name, options)
        .map_err(std::io::Error::other)?;

    let mut file = File::open(&entry.path)?;
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        let bytes = file.read(&mut buffer)?;
        if bytes == 0 {
            break;
        }
        zip.write_all(&buffer[..bytes])?;
        report.bytes_written += bytes as u64;
    }

    report.files_added += 1;

    Ok(())
}

fn append_dir<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    entry: &WalkedEntry,
    report: &mut BuildReport,
) -> Result<()> {
    // Directory entries carry a trailing slash and no payload.
    let options = entry_options(entry).compression_method(CompressionMethod::Stored);
    zip.add_directory(format!("{}/", entry.name), options)
        .map_err(std::io::Error::other)?;

    report.directories_added += 1;

    Ok(())
}

#[cfg(unix)]
fn entry_options(entry: &WalkedEntry) -> SimpleFileOptions {
    use std::os::unix::fs::MetadataExt;
    SimpleFileOptions::default().unix_permissions(entry.metadata.mode())
}

#[cfg(not(unix))]
fn entry_options(_entry: &WalkedEntry) -> SimpleFileOptions {
    SimpleFileOptions::default()
}
