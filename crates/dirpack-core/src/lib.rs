//! Directory-to-ZIP archiving with subtree pruning.
//!
//! `dirpack-core` walks a source directory, prunes excluded directories
//! (`node_modules` and `.git` by default) before descending into them, and
//! writes every remaining file into a deflate-compressed ZIP archive under
//! its path relative to the source root.
//!
//! # Examples
//!
//! ```no_run
//! use dirpack_core::ArchiveConfig;
//! use dirpack_core::Archiver;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ArchiveConfig::new("backend", "deploy.zip").with_exclude("dist");
//! let report = Archiver::new(config).archive()?;
//! println!("Archived {} files", report.files_added);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archiver;
pub mod config;
pub mod error;
pub mod progress;
pub mod report;
pub mod test_utils;
pub mod walker;

// Re-export main API types
pub use archiver::Archiver;
pub use archiver::archive_directory;
pub use config::ArchiveConfig;
pub use config::DEFAULT_EXCLUDES;
pub use config::EntryCompression;
pub use error::ArchiveError;
pub use error::Result;
pub use progress::NoopProgress;
pub use progress::ProgressCallback;
pub use report::ArchiveReport;
pub use walker::ArchiveEntry;
