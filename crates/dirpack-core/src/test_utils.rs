//! Test utilities for building source trees and reading archives back.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Writes each `(relative path, content)` pair below `root`, creating parent
/// directories as needed.
///
/// # Examples
///
/// ```
/// use dirpack_core::test_utils::write_tree;
///
/// let dir = std::env::temp_dir().join("dirpack-doc-write-tree");
/// write_tree(&dir, &[("a.txt", b"hi"), ("sub/b.txt", b"bye")]);
/// assert!(dir.join("sub/b.txt").exists());
/// # std::fs::remove_dir_all(&dir).unwrap();
/// ```
pub fn write_tree(root: &Path, files: &[(&str, &[u8])]) {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

/// Reads every entry of the ZIP archive at `path` into a name → bytes map.
#[must_use]
pub fn read_zip_entries(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entries = BTreeMap::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        entries.insert(entry.name().to_string(), content);
    }

    entries
}

/// Returns the entry names of the ZIP archive at `path` in archive order.
#[must_use]
pub fn zip_entry_names(path: &Path) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}
