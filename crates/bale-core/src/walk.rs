//! Directory tree walking shared by both archive builders.
//!
//! The walker resolves the effective traversal root, visits entries in a
//! deterministic pre-order (lexicographic within each directory), classifies
//! each filesystem object into a closed set of kinds, and computes the
//! slash-normalized archive name with the base-path prefix stripped.

use crate::error::ArchiveError;
use crate::error::Result;
use std::fs::Metadata;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Kind of a filesystem entry that can be archived.
///
/// Anything that is neither a regular file nor a directory (symlinks,
/// sockets, device nodes, FIFOs) is rejected with
/// [`ArchiveError::UnsupportedFileMode`] before any bytes are written for
/// that entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file with a byte payload.
    File,
    /// Directory; header only, no payload.
    Dir,
}

/// A visited filesystem entry with its computed archive name.
#[derive(Debug)]
pub struct WalkedEntry {
    /// Full filesystem path to the entry.
    pub path: PathBuf,

    /// Archive-relative name, forward-slash separated, never empty.
    pub name: String,

    /// Classified kind of the entry.
    pub kind: EntryKind,

    /// Filesystem metadata captured at visit time.
    pub metadata: Metadata,
}

/// Walks a source path (file or directory tree) producing archive entries.
///
/// When a base path is given, the effective root is
/// `absolute(base.join(source))` and entry names are base-relative; the base
/// directory itself strips to an empty name and is skipped. Without a base
/// path, names are relative to the source's parent, so the archive carries
/// the source's own top-level name.
///
/// # Examples
///
/// ```no_run
/// use bale_core::walk::SourceWalker;
/// use std::path::Path;
///
/// let walker = SourceWalker::new(Path::new("project/src"), Some(Path::new("project")))?;
/// for entry in walker.walk() {
///     let entry = entry?;
///     println!("{}", entry.name); // "src", "src/lib.rs", ...
/// }
/// # Ok::<(), bale_core::ArchiveError>(())
/// ```
#[derive(Debug)]
pub struct SourceWalker {
    root: PathBuf,
    strip: PathBuf,
}

impl SourceWalker {
    /// Resolves the effective root for `source` and verifies it exists.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::SourceNotFound`] if the resolved root cannot
    /// be stat-ed, or an I/O error if path absolutization fails.
    pub fn new(source: &Path, base: Option<&Path>) -> Result<Self> {
        let (root, strip) = match base {
            Some(base) => {
                let base = std::path::absolute(base)?;
                let root = std::path::absolute(base.join(source))?;
                (root, base)
            }
            None => {
                let root = source.to_path_buf();
                let strip = root.parent().map_or_else(PathBuf::new, Path::to_path_buf);
                (root, strip)
            }
        };

        if std::fs::symlink_metadata(&root).is_err() {
            return Err(ArchiveError::SourceNotFound { path: root });
        }

        Ok(Self { root, strip })
    }

    /// Returns the effective traversal root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns an iterator over the entries of the tree in deterministic
    /// pre-order. Entries whose stripped name is empty (the base directory
    /// itself) are skipped.
    ///
    /// # Errors
    ///
    /// Individual items error if metadata cannot be read, the entry kind is
    /// unsupported, or the name is not representable.
    pub fn walk(&self) -> impl Iterator<Item = Result<WalkedEntry>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => match self.build_entry(&entry) {
                    Ok(Some(walked)) => Some(Ok(walked)),
                    Ok(None) => None,
                    Err(e) => Some(Err(e)),
                },
                Err(e) => Some(Err(ArchiveError::Io(std::io::Error::other(format!(
                    "directory walk failed: {e}"
                ))))),
            })
    }

    fn build_entry(&self, entry: &walkdir::DirEntry) -> Result<Option<WalkedEntry>> {
        let path = entry.path().to_path_buf();

        let file_type = entry.file_type();
        let kind = if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_dir() {
            EntryKind::Dir
        } else {
            return Err(ArchiveError::UnsupportedFileMode { path });
        };

        let Some(name) = self.archive_name(&path)? else {
            // The base directory strips to an empty name and is not emitted.
            return Ok(None);
        };

        let metadata = entry.metadata().map_err(|e| {
            ArchiveError::Io(std::io::Error::other(format!(
                "cannot read metadata for {}: {e}",
                path.display()
            )))
        })?;

        Ok(Some(WalkedEntry {
            path,
            name,
            kind,
            metadata,
        }))
    }

    /// Computes the slash-normalized archive name for `path`, or `None`
    /// if the name strips to empty.
    fn archive_name(&self, path: &Path) -> Result<Option<String>> {
        let relative = path.strip_prefix(&self.strip).unwrap_or(path);

        let mut name = String::new();
        for component in relative.components() {
            if let Component::Normal(part) = component {
                let part = part
                    .to_str()
                    .ok_or_else(|| ArchiveError::InvalidEntryPath {
                        path: path.to_path_buf(),
                    })?;
                if !name.is_empty() {
                    name.push('/');
                }
                name.push_str(part);
            }
        }

        if name.is_empty() {
            Ok(None)
        } else {
            Ok(Some(name))
        }
    }
}
