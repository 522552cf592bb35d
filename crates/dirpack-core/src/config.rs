//! Configuration for archiving a directory.

use crate::ArchiveError;
use crate::Result;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

/// Directory names pruned when no exclusion set is given.
pub const DEFAULT_EXCLUDES: [&str; 2] = ["node_modules", ".git"];

/// How each entry's bytes are stored in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryCompression {
    /// Deflate compression.
    #[default]
    Deflated,
    /// No compression.
    Stored,
}

/// Configuration for one archiving run.
///
/// Holds the source root, the destination archive path and the set of
/// directory names pruned during traversal.
///
/// # Examples
///
/// ```
/// use dirpack_core::ArchiveConfig;
///
/// let config = ArchiveConfig::new("backend", "deploy.zip")
///     .with_exclude("dist")
///     .with_compression_level(9);
///
/// assert!(config.is_excluded("node_modules"));
/// assert!(config.is_excluded("dist"));
/// assert!(!config.is_excluded("src"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Directory whose contents are archived.
    pub source_root: PathBuf,

    /// Output archive file. Overwritten if it exists.
    pub destination: PathBuf,

    /// Directory names pruned at any depth.
    ///
    /// Default: `{"node_modules", ".git"}`.
    pub exclude: BTreeSet<String>,

    /// Compression method for every entry.
    ///
    /// Default: `EntryCompression::Deflated`.
    pub compression: EntryCompression,

    /// Deflate level (1-9). `None` uses the library default.
    ///
    /// Ignored when `compression` is `Stored`.
    pub compression_level: Option<u8>,

    /// Store Unix permission bits of each file in the archive.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,
}

impl ArchiveConfig {
    /// Creates a configuration with the default exclusion set.
    #[must_use]
    pub fn new(source_root: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            destination: destination.into(),
            exclude: default_excludes(),
            compression: EntryCompression::default(),
            compression_level: None,
            preserve_permissions: true,
        }
    }

    /// Adds one directory name to the exclusion set.
    #[must_use]
    pub fn with_exclude(mut self, name: impl Into<String>) -> Self {
        self.exclude.insert(name.into());
        self
    }

    /// Replaces the exclusion set.
    #[must_use]
    pub fn with_excludes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the compression method.
    #[must_use]
    pub fn with_compression(mut self, compression: EntryCompression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the deflate level.
    ///
    /// # Panics
    ///
    /// Panics if the level is not in the range 1-9.
    /// Use `validate()` for non-panicking validation.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        assert!((1..=9).contains(&level), "compression level must be 1-9");
        self.compression_level = Some(level);
        self
    }

    /// Sets whether Unix permissions are stored.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Returns `true` if a directory with this name is pruned.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.contains(name)
    }

    /// Validates the exclusion names and the compression level.
    ///
    /// Filesystem checks on the source and destination happen when the
    /// archive is created, not here.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An exclusion name is empty, `.`, `..`, or contains a separator
    /// - Compression level is set but not in range 1-9
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.exclude.iter().find(|n| !is_single_component(n)) {
            return Err(ArchiveError::InvalidExcludeName { name: name.clone() });
        }

        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(ArchiveError::InvalidCompressionLevel { level });
        }

        Ok(())
    }

    /// Returns the directory the destination will be written into.
    ///
    /// A bare file name resolves to the current directory.
    #[must_use]
    pub fn destination_parent(&self) -> &Path {
        match self.destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// Returns the default exclusion set as owned names.
#[must_use]
pub fn default_excludes() -> BTreeSet<String> {
    DEFAULT_EXCLUDES.iter().map(|s| (*s).to_string()).collect()
}

fn is_single_component(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
