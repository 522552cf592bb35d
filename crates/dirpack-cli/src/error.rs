//! Error conversion utilities for CLI.
//!
//! Converts dirpack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use dirpack_core::ArchiveConfig;
use dirpack_core::ArchiveError;

/// Converts `ArchiveError` to user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError, config: &ArchiveConfig) -> anyhow::Error {
    let source = config.source_root.display();
    let destination = config.destination.display();

    match err {
        ArchiveError::SourceNotFound { path } => {
            anyhow!(
                "Source directory not found: {}\n\
                 HINT: Check the SOURCE argument or \"sourceRoot\" in the config file.",
                path.display()
            )
        }
        ArchiveError::SourceNotDirectory { path } => {
            anyhow!(
                "Source is not a directory: {}\n\
                 HINT: dirpack archives whole directories; pass the directory to pack.",
                path.display()
            )
        }
        ArchiveError::SourceUnreadable { path, source: io_err } => {
            anyhow!(
                "Cannot read source directory {}: {io_err}\n\
                 HINT: Check that you have read and execute permission on it.",
                path.display()
            )
        }
        ArchiveError::DestinationNotWritable { path, source: io_err } => {
            anyhow!(
                "Cannot write output archive {}: {io_err}\n\
                 HINT: Choose an output location you can write to.",
                path.display()
            )
        }
        ArchiveError::DestinationParentMissing { path } => {
            anyhow!(
                "Output directory does not exist: {}\n\
                 HINT: Create it first (mkdir -p {}).",
                path.display(),
                path.display()
            )
        }
        ArchiveError::InvalidExcludeName { name } => {
            anyhow!(
                "Invalid exclude name {name:?}\n\
                 HINT: Exclusions are single directory names such as node_modules, not paths or patterns."
            )
        }
        ArchiveError::InvalidCompressionLevel { level } => {
            anyhow!(
                "Invalid compression level {level}\n\
                 HINT: Use a level between 1 (fastest) and 9 (smallest)."
            )
        }
        ArchiveError::InvalidEntryName { path } => {
            anyhow!(
                "Cannot store '{}' in the archive: name is not valid UTF-8\n\
                 HINT: Rename the file or exclude its directory.",
                path.display()
            )
        }
        ArchiveError::Traversal { path, source: walk_err } => {
            anyhow!(
                "Cannot read '{}' while archiving '{source}': {walk_err}",
                path.display()
            )
        }
        ArchiveError::Io(io_err) => {
            anyhow!("I/O error while creating '{destination}' from '{source}': {io_err}")
        }
    }
}
