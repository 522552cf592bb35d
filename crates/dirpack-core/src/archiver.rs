//! ZIP archive creation from a pruned directory tree.

use crate::ArchiveError;
use crate::Result;
use crate::config::ArchiveConfig;
use crate::config::EntryCompression;
use crate::progress::NoopProgress;
use crate::progress::ProgressCallback;
use crate::progress::ProgressTracker;
use crate::report::ArchiveReport;
use crate::walker::ArchiveEntry;
use crate::walker::PrunedWalker;
use crate::walker::ensure_source_root;
use same_file::Handle;
use std::fs::File;
use std::io::ErrorKind;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Writes one ZIP archive of a directory tree.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::ArchiveConfig;
/// use dirpack_core::Archiver;
///
/// let config = ArchiveConfig::new("backend", "deploy.zip");
/// let report = Archiver::new(config).archive()?;
/// println!("Added {} files", report.files_added);
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Archiver {
    config: ArchiveConfig,
}

impl Archiver {
    /// Creates an archiver for the given configuration.
    #[must_use]
    pub fn new(config: ArchiveConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration of this archiver.
    #[must_use]
    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Archives the source root into the destination.
    ///
    /// # Errors
    ///
    /// See [`Archiver::archive_with_progress`].
    pub fn archive(&self) -> Result<ArchiveReport> {
        self.archive_with_progress(&mut NoopProgress)
    }

    /// Archives the source root into the destination, reporting each entry
    /// to `progress`.
    ///
    /// The source root, the destination parent and the configuration are all
    /// checked, and the tree is fully walked, before the destination is
    /// opened. A run that fails at that stage leaves any existing destination
    /// untouched. Once writing has begun, an error aborts the run and the
    /// partial archive is left on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - Source root does not exist or is not a directory
    /// - Destination parent directory does not exist
    /// - The destination cannot be created
    /// - Traversal, a file read or an archive write fails
    pub fn archive_with_progress(
        &self,
        progress: &mut dyn ProgressCallback,
    ) -> Result<ArchiveReport> {
        let start = Instant::now();
        let config = &self.config;

        config.validate()?;
        ensure_source_root(&config.source_root)?;

        let parent = config.destination_parent();
        if !parent.is_dir() {
            return Err(ArchiveError::DestinationParentMissing {
                path: parent.to_path_buf(),
            });
        }

        let mut report = ArchiveReport::new();
        let mut entries = PrunedWalker::new(config)
            .walk()
            .collect::<Result<Vec<_>>>()?;
        exclude_destination(&mut entries, &config.destination, &mut report);

        let file = create_destination(&config.destination)?;
        let file = write_archive(file, &entries, config, &mut report, progress)?;
        file.sync_all()?;

        report.archive_size = file.metadata()?.len();
        report.duration = start.elapsed();

        Ok(report)
    }
}

/// Archives `source_root` into `destination` with the default exclusions.
///
/// # Examples
///
/// ```no_run
/// use dirpack_core::archive_directory;
///
/// let report = archive_directory("backend", "deploy.zip")?;
/// println!("{} files", report.files_added);
/// # Ok::<(), dirpack_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// See [`Archiver::archive_with_progress`].
pub fn archive_directory(
    source_root: impl Into<PathBuf>,
    destination: impl Into<PathBuf>,
) -> Result<ArchiveReport> {
    Archiver::new(ArchiveConfig::new(source_root, destination)).archive()
}

/// Writes `entries` as a ZIP archive into `writer` and returns the writer
/// once the central directory has been written.
///
/// Updates `files_added` and `bytes_read` in `report`. Calls
/// `progress.on_complete()` after the archive is finalized.
///
/// # Errors
///
/// Returns an error if a source file cannot be read or the archive cannot
/// be written.
pub fn write_archive<W: Write + Seek>(
    writer: W,
    entries: &[ArchiveEntry],
    config: &ArchiveConfig,
    report: &mut ArchiveReport,
    progress: &mut dyn ProgressCallback,
) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = entry_options(config);
    let mut tracker = ProgressTracker::new(progress, entries.len());

    for entry in entries {
        tracker.on_entry_start(&entry.name);

        let file = File::open(&entry.path)?;
        let metadata = file.metadata()?;

        let file_options = options.large_file(metadata.len() >= u64::from(u32::MAX));
        #[cfg(unix)]
        let file_options = if config.preserve_permissions {
            use std::os::unix::fs::PermissionsExt;
            file_options.unix_permissions(metadata.permissions().mode())
        } else {
            file_options
        };

        zip.start_file(entry.name.as_str(), file_options)
            .map_err(|e| {
                std::io::Error::other(format!("failed to start entry {}: {e}", entry.name))
            })?;

        let copied = {
            let mut reader = tracker.reader(file);
            std::io::copy(&mut reader, &mut zip)?
        };

        report.files_added += 1;
        report.bytes_read += copied;

        tracker.on_entry_complete(&entry.name);
    }

    let writer = zip
        .finish()
        .map_err(|e| std::io::Error::other(format!("failed to finish ZIP archive: {e}")))?;

    tracker.on_complete();

    Ok(writer)
}

/// Builds the per-entry options shared by every file in the archive.
fn entry_options(config: &ArchiveConfig) -> SimpleFileOptions {
    match config.compression {
        EntryCompression::Stored => {
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
        }
        EntryCompression::Deflated => SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(config.compression_level.map(i64::from)),
    }
}

/// Drops every entry that is the destination file itself, whether reached
/// by its own path, a symlink or a hardlink.
///
/// Aliases share the destination's inode, so their walked size must match
/// before the more expensive identity check runs. A destination that does
/// not exist yet cannot have aliases in the tree.
fn exclude_destination(
    entries: &mut Vec<ArchiveEntry>,
    destination: &Path,
    report: &mut ArchiveReport,
) {
    let Ok(destination_len) = destination.metadata().map(|m| m.len()) else {
        return;
    };
    let Ok(destination_handle) = Handle::from_path(destination) else {
        return;
    };

    entries.retain(|entry| {
        let is_destination = entry.size == destination_len
            && Handle::from_path(&entry.path).is_ok_and(|handle| handle == destination_handle);
        if is_destination {
            report.add_warning(format!(
                "Skipped destination archive inside source tree: {}",
                entry.name
            ));
        }
        !is_destination
    });
}

/// Creates the destination, reporting a permission failure as a path error.
fn create_destination(destination: &Path) -> Result<File> {
    File::create(destination).map_err(|source| {
        if source.kind() == ErrorKind::PermissionDenied {
            ArchiveError::DestinationNotWritable {
                path: destination.to_path_buf(),
                source,
            }
        } else {
            ArchiveError::Io(source)
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::read_zip_entries;
    use crate::test_utils::write_tree;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_archive_default_exclusions() {
        let source = TempDir::new().unwrap();
        write_tree(
            source.path(),
            &[
                ("a.txt", b"hi"),
                ("node_modules/x.js", b"ignored"),
                (".git/HEAD", b"ignored"),
                ("sub/b.txt", b"bye"),
            ],
        );
        let out = TempDir::new().unwrap();
        let destination = out.path().join("out.zip");

        let report = archive_directory(source.path(), &destination).unwrap();

        assert_eq!(report.files_added, 2);
        assert_eq!(report.bytes_read, 5);
        assert!(report.archive_size > 0);
        assert!(!report.has_warnings());

        let entries = read_zip_entries(&destination);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["a.txt"], b"hi");
        assert_eq!(entries["sub/b.txt"], b"bye");
    }

    #[test]
    fn test_archive_empty_source() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let destination = out.path().join("empty.zip");

        let report = archive_directory(source.path(), &destination).unwrap();

        assert_eq!(report.files_added, 0);
        assert!(read_zip_entries(&destination).is_empty());
    }

    #[test]
    fn test_archive_uses_deflate() {
        let source = TempDir::new().unwrap();
        write_tree(source.path(), &[("big.txt", "a".repeat(10_000).as_bytes())]);
        let out = TempDir::new().unwrap();
        let destination = out.path().join("out.zip");

        let report = archive_directory(source.path(), &destination).unwrap();
        assert!(report.archive_size < 10_000);
        assert!(report.compression_ratio() > 1.0);

        let mut archive = zip::ZipArchive::new(File::open(&destination).unwrap()).unwrap();
        let entry = archive.by_name("big.txt").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
    }

    #[test]
    fn test_archive_stored() {
        let source = TempDir::new().unwrap();
        write_tree(source.path(), &[("data.txt", b"plain")]);
        let out = TempDir::new().unwrap();
        let destination = out.path().join("out.zip");

        let config = ArchiveConfig::new(source.path(), &destination)
            .with_compression(EntryCompression::Stored);
        Archiver::new(config).archive().unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&destination).unwrap()).unwrap();
        let entry = archive.by_name("data.txt").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Stored);
    }

    #[test]
    fn test_archive_compression_levels() {
        let source = TempDir::new().unwrap();
        write_tree(source.path(), &[("test.txt", "abc".repeat(5000).as_bytes())]);
        let out = TempDir::new().unwrap();

        for level in [1, 6, 9] {
            let destination = out.path().join(format!("out_{level}.zip"));
            let config =
                ArchiveConfig::new(source.path(), &destination).with_compression_level(level);
            let report = Archiver::new(config).archive().unwrap();
            assert_eq!(report.files_added, 1);
            assert_eq!(
                read_zip_entries(&destination)["test.txt"],
                "abc".repeat(5000).as_bytes()
            );
        }
    }

    #[test]
    fn test_archive_overwrites_existing_destination() {
        let source = TempDir::new().unwrap();
        write_tree(source.path(), &[("a.txt", b"new")]);
        let out = TempDir::new().unwrap();
        let destination = out.path().join("out.zip");
        fs::write(&destination, "stale bytes that are not a zip").unwrap();

        archive_directory(source.path(), &destination).unwrap();

        let entries = read_zip_entries(&destination);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries["a.txt"], b"new");
    }

    #[test]
    fn test_archive_nonexistent_source_leaves_destination_untouched() {
        let out = TempDir::new().unwrap();
        let destination = out.path().join("out.zip");
        fs::write(&destination, "previous").unwrap();

        let result = archive_directory(out.path().join("missing"), &destination);

        assert!(matches!(result, Err(ArchiveError::SourceNotFound { .. })));
        assert_eq!(fs::read(&destination).unwrap(), b"previous");
    }

    #[test]
    fn test_archive_missing_destination_parent() {
        let source = TempDir::new().unwrap();
        write_tree(source.path(), &[("a.txt", b"x")]);
        let out = TempDir::new().unwrap();
        let destination = out.path().join("no/such/dir/out.zip");

        let result = archive_directory(source.path(), &destination);

        assert!(matches!(
            result,
            Err(ArchiveError::DestinationParentMissing { .. })
        ));
        assert!(!destination.exists());
    }

    #[test]
    fn test_archive_invalid_config_fails_before_writing() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let destination = out.path().join("out.zip");

        let config = ArchiveConfig::new(source.path(), &destination).with_exclude("a/b");
        let result = Archiver::new(config).archive();

        assert!(matches!(result, Err(ArchiveError::InvalidExcludeName { .. })));
        assert!(!destination.exists());
    }

    #[test]
    fn test_archive_skips_destination_inside_source() {
        let source = TempDir::new().unwrap();
        write_tree(source.path(), &[("a.txt", b"hi")]);
        let destination = source.path().join("self.zip");
        fs::write(&destination, "old archive").unwrap();

        let report = archive_directory(source.path(), &destination).unwrap();

        assert_eq!(report.files_added, 1);
        assert!(report.has_warnings());
        let entries = read_zip_entries(&destination);
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["a.txt"]);
    }

    #[cfg(unix)]
    fn archive_with_destination_alias(compression: EntryCompression, hardlink: bool) {
        let source = TempDir::new().unwrap();
        write_tree(source.path(), &[("a.txt", b"hi")]);
        let out = TempDir::new().unwrap();
        let destination = out.path().join("o.zip");
        fs::write(&destination, "previous archive").unwrap();
        let alias = source.path().join("link.zip");
        if hardlink {
            fs::hard_link(&destination, &alias).unwrap();
        } else {
            std::os::unix::fs::symlink(&destination, &alias).unwrap();
        }

        let config = ArchiveConfig::new(source.path(), &destination).with_compression(compression);
        let report = Archiver::new(config).archive().unwrap();

        assert_eq!(report.files_added, 1);
        assert_eq!(
            report.warnings,
            vec!["Skipped destination archive inside source tree: link.zip".to_string()]
        );
        let entries = read_zip_entries(&destination);
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["a.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_archive_skips_symlink_to_destination_deflated() {
        archive_with_destination_alias(EntryCompression::Deflated, false);
    }

    #[cfg(unix)]
    #[test]
    fn test_archive_skips_symlink_to_destination_stored() {
        archive_with_destination_alias(EntryCompression::Stored, false);
    }

    #[cfg(unix)]
    #[test]
    fn test_archive_skips_hardlink_to_destination() {
        archive_with_destination_alias(EntryCompression::Stored, true);
    }

    #[cfg(unix)]
    #[test]
    fn test_archive_unwritable_destination_is_path_error() {
        use std::os::unix::fs::PermissionsExt;

        let source = TempDir::new().unwrap();
        write_tree(source.path(), &[("a.txt", b"x")]);
        let out = TempDir::new().unwrap();
        let locked = out.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Root can write anywhere; nothing to check in that case.
        if File::create(locked.join("write-check")).is_ok() {
            return;
        }

        let err = archive_directory(source.path(), locked.join("out.zip")).unwrap_err();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(err, ArchiveError::DestinationNotWritable { .. }));
        assert!(err.is_path_error());
        assert!(!err.is_io_error());
    }

    #[cfg(unix)]
    #[test]
    fn test_archive_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let source = TempDir::new().unwrap();
        write_tree(source.path(), &[("run.sh", b"#!/bin/sh\n")]);
        fs::set_permissions(
            source.path().join("run.sh"),
            fs::Permissions::from_mode(0o755),
        )
        .unwrap();
        let out = TempDir::new().unwrap();
        let destination = out.path().join("out.zip");

        archive_directory(source.path(), &destination).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&destination).unwrap()).unwrap();
        let entry = archive.by_name("run.sh").unwrap();
        assert_eq!(entry.unix_mode().unwrap() & 0o777, 0o755);
    }

    #[test]
    fn test_write_archive_in_memory() {
        let source = TempDir::new().unwrap();
        write_tree(source.path(), &[("one.txt", b"1"), ("dir/two.txt", b"22")]);
        let config = ArchiveConfig::new(source.path(), "unused.zip");
        let entries = crate::walker::collect_entries(&config).unwrap();

        let mut report = ArchiveReport::new();
        let cursor = write_archive(
            Cursor::new(Vec::new()),
            &entries,
            &config,
            &mut report,
            &mut NoopProgress,
        )
        .unwrap();

        assert_eq!(report.files_added, 2);
        assert_eq!(report.bytes_read, 3);

        let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        assert_eq!(archive.len(), 2);
        assert!(archive.by_name("dir/two.txt").is_ok());
    }

    #[test]
    fn test_progress_events_per_entry() {
        #[derive(Default)]
        struct Recorder {
            started: Vec<(String, usize, usize)>,
            completed: Vec<String>,
            bytes: u64,
            finished: usize,
        }

        impl ProgressCallback for Recorder {
            fn on_entry_start(&mut self, name: &str, total: usize, current: usize) {
                self.started.push((name.to_string(), total, current));
            }
            fn on_bytes_written(&mut self, bytes: u64) {
                self.bytes += bytes;
            }
            fn on_entry_complete(&mut self, name: &str) {
                self.completed.push(name.to_string());
            }
            fn on_complete(&mut self) {
                self.finished += 1;
            }
        }

        let source = TempDir::new().unwrap();
        write_tree(source.path(), &[("a.txt", b"aaaa"), ("b/c.txt", b"cc")]);
        let out = TempDir::new().unwrap();

        let mut recorder = Recorder::default();
        let config = ArchiveConfig::new(source.path(), out.path().join("out.zip"));
        Archiver::new(config)
            .archive_with_progress(&mut recorder)
            .unwrap();

        assert_eq!(
            recorder.started,
            vec![("a.txt".to_string(), 2, 1), ("b/c.txt".to_string(), 2, 2)]
        );
        assert_eq!(recorder.completed, vec!["a.txt", "b/c.txt"]);
        assert_eq!(recorder.bytes, 6);
        assert_eq!(recorder.finished, 1);
    }
}
