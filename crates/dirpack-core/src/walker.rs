//! Directory tree walking with subtree pruning.
//!
//! Excluded directories are removed by a predicate evaluated before the
//! walker descends into them, so nothing beneath an excluded directory is
//! ever read.

use crate::ArchiveError;
use crate::Result;
use crate::config::ArchiveConfig;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use walkdir::DirEntry;
use walkdir::WalkDir;

/// Walks the source root of an `ArchiveConfig`, pruning excluded directories.
///
/// Entries are produced depth-first, top-down, sorted by file name within
/// each directory. Only files are yielded; directories contribute nothing but
/// their contents.
///
/// Symbolic links are not followed. A link to a regular file yields an entry
/// (its content is the target's); a link to a directory is neither descended
/// nor yielded; a dangling link yields an I/O error.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::ArchiveConfig;
/// use dirpack_core::walker::PrunedWalker;
///
/// let config = ArchiveConfig::new("./backend", "deploy.zip");
/// for entry in PrunedWalker::new(&config).walk() {
///     let entry = entry?;
///     println!("would add: {}", entry.name);
/// }
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
pub struct PrunedWalker<'a> {
    config: &'a ArchiveConfig,
}

impl<'a> PrunedWalker<'a> {
    /// Creates a walker over `config.source_root`.
    #[must_use]
    pub fn new(config: &'a ArchiveConfig) -> Self {
        Self { config }
    }

    /// Returns an iterator over the files to archive.
    ///
    /// # Errors
    ///
    /// Items may error if:
    /// - A directory cannot be read (`ArchiveError::Traversal`)
    /// - File metadata cannot be read, e.g. a dangling symlink
    /// - A path is not valid UTF-8
    pub fn walk(&self) -> impl Iterator<Item = Result<ArchiveEntry>> + '_ {
        let root = self.config.source_root.as_path();

        WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !self.is_pruned(entry))
            .filter_map(move |entry| match entry {
                Ok(entry) => build_entry(root, &entry).transpose(),
                Err(e) => Some(Err(traversal_error(root, e))),
            })
    }

    /// Returns `true` for directories below the root whose name is excluded.
    fn is_pruned(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.config.is_excluded(name))
    }
}

/// A file selected for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Filesystem path of the file.
    pub path: PathBuf,

    /// Entry name in the archive: the path relative to the source root,
    /// joined with `/`.
    pub name: String,

    /// Size in bytes at discovery time.
    pub size: u64,
}

/// Collects every file to archive in a single traversal.
///
/// The source root is checked first, so a missing or non-directory source
/// fails before anything else happens.
///
/// # Errors
///
/// Returns an error if:
/// - Source root does not exist or is not a directory
/// - Directory traversal fails
/// - File metadata cannot be read
pub fn collect_entries(config: &ArchiveConfig) -> Result<Vec<ArchiveEntry>> {
    ensure_source_root(&config.source_root)?;
    PrunedWalker::new(config).walk().collect()
}

/// Checks that `root` exists, is a directory and can be listed.
///
/// # Errors
///
/// Returns `SourceNotFound`, `SourceNotDirectory` or `SourceUnreadable`.
pub fn ensure_source_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(ArchiveError::SourceNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(ArchiveError::SourceNotDirectory {
            path: root.to_path_buf(),
        });
    }
    if let Err(source) = std::fs::read_dir(root) {
        return Err(ArchiveError::SourceUnreadable {
            path: root.to_path_buf(),
            source,
        });
    }
    Ok(())
}

/// Computes the archive entry name of `path` relative to `root`.
///
/// # Examples
///
/// ```
/// use dirpack_core::walker::archive_name;
/// use std::path::Path;
///
/// let name = archive_name(Path::new("/srv/app"), Path::new("/srv/app/src/main.js"))?;
/// assert_eq!(name, "src/main.js");
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns `ArchiveError::InvalidEntryName` if `path` is not below `root`,
/// is `root` itself, or has a component that is not valid UTF-8.
pub fn archive_name(root: &Path, path: &Path) -> Result<String> {
    let invalid = || ArchiveError::InvalidEntryName {
        path: path.to_path_buf(),
    };

    let relative = path.strip_prefix(root).map_err(|_| invalid())?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(invalid)?),
            Component::CurDir => {}
            _ => return Err(invalid()),
        }
    }

    if parts.is_empty() {
        return Err(invalid());
    }

    Ok(parts.join("/"))
}

/// Turns a walked entry into an `ArchiveEntry`, or `None` if it is not a
/// file to archive.
fn build_entry(root: &Path, entry: &DirEntry) -> Result<Option<ArchiveEntry>> {
    let file_type = entry.file_type();

    let size = if file_type.is_file() {
        entry
            .metadata()
            .map_err(|e| traversal_error(root, e))?
            .len()
    } else if file_type.is_symlink() {
        // Resolve the link; only links to regular files are archived.
        let target = std::fs::metadata(entry.path()).map_err(|e| {
            ArchiveError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot read symlink target of {}: {e}", entry.path().display()),
            ))
        })?;
        if !target.is_file() {
            return Ok(None);
        }
        target.len()
    } else {
        // Directories and special files.
        return Ok(None);
    };

    Ok(Some(ArchiveEntry {
        path: entry.path().to_path_buf(),
        name: archive_name(root, entry.path())?,
        size,
    }))
}

fn traversal_error(root: &Path, err: walkdir::Error) -> ArchiveError {
    let path = err.path().unwrap_or(root).to_path_buf();
    ArchiveError::Traversal { path, source: err }
}
