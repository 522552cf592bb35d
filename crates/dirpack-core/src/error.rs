//! Error types for directory archiving.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while archiving a directory.
///
/// Every variant is fatal: the archiver never retries or skips past an
/// error, and a partially written destination is left as is.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed (reading a source file, writing the archive).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source root does not exist.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// Source root exists but is not a directory.
    #[error("source is not a directory: {path}")]
    SourceNotDirectory {
        /// The offending source path.
        path: PathBuf,
    },

    /// Source root exists but its contents cannot be listed.
    #[error("cannot read source directory {path}: {source}")]
    SourceUnreadable {
        /// The unreadable source root.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Destination cannot be created because permission was denied.
    #[error("cannot create destination {path}: {source}")]
    DestinationNotWritable {
        /// The destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Parent directory of the destination does not exist.
    #[error("destination directory does not exist: {path}")]
    DestinationParentMissing {
        /// The missing parent directory.
        path: PathBuf,
    },

    /// Directory traversal failed below the source root.
    #[error("cannot traverse {path}: {source}")]
    Traversal {
        /// Path being visited when the walk failed.
        path: PathBuf,
        /// Underlying walker error.
        source: walkdir::Error,
    },

    /// A source path cannot be expressed as an archive entry name.
    #[error("path cannot be stored as an archive entry name: {path}")]
    InvalidEntryName {
        /// The source path.
        path: PathBuf,
    },

    /// Exclusion name is not a single path component.
    #[error("invalid exclude name {name:?}: must be a single directory name")]
    InvalidExcludeName {
        /// The rejected name.
        name: String,
    },

    /// Compression level out of range.
    #[error("invalid compression level {level}, must be 1-9")]
    InvalidCompressionLevel {
        /// The invalid compression level.
        level: u8,
    },
}

impl ArchiveError {
    /// Returns `true` if this error concerns the source or destination path
    /// or the configuration, rather than a failed read or write.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirpack_core::ArchiveError;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiveError::SourceNotFound {
    ///     path: PathBuf::from("/missing"),
    /// };
    /// assert!(err.is_path_error());
    /// assert!(!err.is_io_error());
    /// ```
    #[must_use]
    pub const fn is_path_error(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. }
                | Self::SourceNotDirectory { .. }
                | Self::SourceUnreadable { .. }
                | Self::DestinationParentMissing { .. }
                | Self::DestinationNotWritable { .. }
                | Self::InvalidEntryName { .. }
                | Self::InvalidExcludeName { .. }
                | Self::InvalidCompressionLevel { .. }
        )
    }

    /// Returns `true` if this error is a read, write or traversal failure
    /// below the source root or while writing archive data.
    ///
    /// Failures to list the source root itself or to create the destination
    /// for lack of permission are path errors instead.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Traversal { .. })
    }

    /// Returns the filesystem path this error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::SourceNotFound { path }
            | Self::SourceNotDirectory { path }
            | Self::SourceUnreadable { path, .. }
            | Self::DestinationParentMissing { path }
            | Self::DestinationNotWritable { path, .. }
            | Self::Traversal { path, .. }
            | Self::InvalidEntryName { path } => Some(path),
            _ => None,
        }
    }
}
