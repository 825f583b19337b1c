//! Integration tests for bale-core.
//!
//! These tests verify end-to-end archive creation workflows with real
//! filesystem operations, extracting the produced archives to check names
//! and contents.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use bale_core::ArchiveError;
use bale_core::ArchiveFormat;
use bale_core::create_archive;
use bale_core::create_tarball;
use bale_core::create_tarball_with_checksum;
use bale_core::create_zipball;
use bale_core::create_zipball_with_checksum;
use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

/// Creates a small source tree: `pkg/{a.txt, sub/{b.txt}}`.
fn create_source_tree(dir: &Path) -> std::path::PathBuf {
    let root = dir.join("pkg");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a.txt"), "alpha content").unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub/b.txt"), "beta content").unwrap();
    root
}

/// Extracts a tarball to a map of entry name to content (files only).
fn extract_tarball(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let file = fs::File::open(path).unwrap();
    let decoder = flate2::read::GzDecoder::new(file);
    let mut archive = tar::Archive::new(decoder);
    let mut out = BTreeMap::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let name = entry.path().unwrap().to_string_lossy().into_owned();
        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        out.insert(name, content);
    }
    out
}

/// Extracts a zipball to a map of entry name to content (files only).
fn extract_zipball(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let bytes = fs::read(path).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut out = BTreeMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        out.insert(name, content);
    }
    out
}

#[test]
fn test_tarball_tree_roundtrip() {
    let temp = TempDir::new().unwrap();
    let source = create_source_tree(temp.path());
    let dest = temp.path().join("out/pkg.tar.gz");

    let outcome = create_tarball(None, &source, dest.to_str().unwrap()).unwrap();

    assert_eq!(outcome.path, dest);
    assert_eq!(outcome.report.files_added, 2);
    assert_eq!(outcome.report.directories_added, 2);
    assert!(dest.exists());

    let files = extract_tarball(&dest);
    assert_eq!(files["pkg/a.txt"], b"alpha content");
    assert_eq!(files["pkg/sub/b.txt"], b"beta content");
}

#[test]
fn test_zipball_tree_roundtrip() {
    let temp = TempDir::new().unwrap();
    let source = create_source_tree(temp.path());
    let dest = temp.path().join("out/pkg.zip");

    let outcome = create_zipball(None, &source, dest.to_str().unwrap()).unwrap();

    assert_eq!(outcome.report.files_added, 2);
    assert!(outcome.report.bytes_compressed > 0);

    let files = extract_zipball(&dest);
    assert_eq!(files["pkg/a.txt"], b"alpha content");
    assert_eq!(files["pkg/sub/b.txt"], b"beta content");
}

#[test]
fn test_tarball_single_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("notes.txt");
    fs::write(&file, "just one file").unwrap();
    let dest = temp.path().join("notes.tar.gz");

    create_tarball(None, &file, dest.to_str().unwrap()).unwrap();

    let files = extract_tarball(&dest);
    assert_eq!(files.len(), 1);
    assert_eq!(files["notes.txt"], b"just one file");
}

#[test]
fn test_base_path_strips_prefix_in_both_formats() {
    let temp = TempDir::new().unwrap();
    create_source_tree(temp.path());

    for format in [ArchiveFormat::TarGz, ArchiveFormat::Zip] {
        let dest = temp
            .path()
            .join(format!("stripped.{}", format.extension()));
        create_archive(
            Some(temp.path()),
            Path::new("pkg"),
            dest.to_str().unwrap(),
            format,
        )
        .unwrap();

        let files = match format {
            ArchiveFormat::TarGz => extract_tarball(&dest),
            ArchiveFormat::Zip => extract_zipball(&dest),
        };
        let names: Vec<_> = files.keys().cloned().collect();
        assert_eq!(names, vec!["pkg/a.txt", "pkg/sub/b.txt"]);
    }
}

#[test]
fn test_missing_source_leaves_no_destination() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("ghost.tar.gz");

    let result = create_tarball(None, Path::new("/no/such/source"), dest.to_str().unwrap());

    assert!(matches!(
        result.unwrap_err(),
        ArchiveError::SourceNotFound { .. }
    ));
    assert!(!dest.exists());
}

#[cfg(unix)]
#[test]
fn test_unsupported_entry_leaves_no_destination() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("mixed");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("ok.txt"), "fine").unwrap();
    let _listener = std::os::unix::net::UnixListener::bind(root.join("ipc.sock")).unwrap();
    let dest = temp.path().join("mixed.tar.gz");

    let result = create_tarball(None, &root, dest.to_str().unwrap());

    assert!(matches!(
        result.unwrap_err(),
        ArchiveError::UnsupportedFileMode { .. }
    ));
    assert!(!dest.exists());
}

#[test]
fn test_blank_destination_uses_source_basename() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("named")).unwrap();
    fs::write(temp.path().join("named/f.txt"), "x").unwrap();

    // Resolve against a scratch working directory so the fallback file lands
    // somewhere disposable.
    let cwd = std::env::current_dir().unwrap();
    std::env::set_current_dir(temp.path()).unwrap();
    let outcome = create_tarball(None, Path::new("named"), "  ");
    std::env::set_current_dir(cwd).unwrap();

    let outcome = outcome.unwrap();
    assert_eq!(outcome.path, Path::new("named.tar.gz"));
    assert!(temp.path().join("named.tar.gz").exists());
}

#[test]
fn test_destination_suffix_appended() {
    let temp = TempDir::new().unwrap();
    let source = create_source_tree(temp.path());
    let dest = temp.path().join("plain-name");

    let outcome = create_zipball(None, &source, dest.to_str().unwrap()).unwrap();

    assert_eq!(outcome.path, temp.path().join("plain-name.zip"));
    assert!(outcome.path.exists());
}

#[test]
fn test_tarball_with_checksum_manifest() {
    let temp = TempDir::new().unwrap();
    let source = create_source_tree(temp.path());
    let dest = temp.path().join("pkg.tar.gz");
    let template = temp.path().join("pkg.CHECKSUM.tar.txt");

    let outcome = create_tarball_with_checksum(
        None,
        &source,
        dest.to_str().unwrap(),
        "sha256",
        &template,
    )
    .unwrap();

    let manifest_path = outcome.checksum.unwrap();
    assert_eq!(manifest_path, temp.path().join("pkg.sha256.tar.txt"));

    let manifest = fs::read_to_string(&manifest_path).unwrap();
    let expected =
        bale_core::compute_checksum(fs::File::open(&dest).unwrap(), "sha256".parse().unwrap())
            .unwrap();
    assert_eq!(manifest, format!("{expected}  pkg.tar.gz\n"));
}

#[test]
fn test_zipball_with_checksum_manifest() {
    let temp = TempDir::new().unwrap();
    let source = create_source_tree(temp.path());
    let dest = temp.path().join("pkg.zip");
    let template = temp.path().join("pkg.CHECKSUM.zip.txt");

    let outcome =
        create_zipball_with_checksum(None, &source, dest.to_str().unwrap(), "md5", &template)
            .unwrap();

    let manifest_path = outcome.checksum.unwrap();
    assert_eq!(manifest_path, temp.path().join("pkg.md5.zip.txt"));
    let manifest = fs::read_to_string(manifest_path).unwrap();
    assert!(manifest.ends_with("  pkg.zip\n"));
    assert_eq!(manifest.split("  ").next().unwrap().len(), 32);
}

#[test]
fn test_checksum_invalid_algorithm_keeps_archive_only() {
    let temp = TempDir::new().unwrap();
    let source = create_source_tree(temp.path());
    let dest = temp.path().join("pkg.tar.gz");
    let template = temp.path().join("pkg.CHECKSUM.txt");

    let result =
        create_tarball_with_checksum(None, &source, dest.to_str().unwrap(), "md55", &template);

    assert!(matches!(
        result.unwrap_err(),
        ArchiveError::UnsupportedAlgorithm { .. }
    ));
    // The archive was already written; only the manifest step failed.
    assert!(dest.exists());
    assert!(!temp.path().join("pkg.md55.txt").exists());
}

#[test]
fn test_repacking_unchanged_source_is_stable() {
    let temp = TempDir::new().unwrap();
    let source = create_source_tree(temp.path());
    let first = temp.path().join("one.tar.gz");
    let second = temp.path().join("two.tar.gz");

    create_tarball(None, &source, first.to_str().unwrap()).unwrap();
    create_tarball(None, &source, second.to_str().unwrap()).unwrap();

    assert_eq!(extract_tarball(&first), extract_tarball(&second));
}

#[cfg(unix)]
#[test]
fn test_destination_is_world_accessible() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let source = create_source_tree(temp.path());
    let dest = temp.path().join("perms.tar.gz");

    create_tarball(None, &source, dest.to_str().unwrap()).unwrap();

    let mode = fs::metadata(&dest).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o777);
}
