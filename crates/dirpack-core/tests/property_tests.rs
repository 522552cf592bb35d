//! Property-based tests for archive contents.
//!
//! These tests use proptest to generate directory trees and verify that the
//! archive holds exactly the files outside excluded directories.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use dirpack_core::ArchiveConfig;
use dirpack_core::Archiver;
use dirpack_core::test_utils::read_zip_entries;
use dirpack_core::test_utils::write_tree;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use tempfile::TempDir;

/// Directory components. Excluded names are mixed in so that pruning is
/// exercised at every depth. Regular directory names carry a `d_` prefix and
/// file names an `f_` prefix, so a path is never both a file and a directory.
fn dir_component() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "d_[a-z]{1,4}",
        1 => Just("node_modules".to_string()),
        1 => Just(".git".to_string()),
        1 => Just("dist".to_string()),
    ]
}

fn file_path() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(dir_component(), 0..4),
        "f_[a-z0-9]{1,6}\\.txt",
    )
        .prop_map(|(dirs, file)| {
            let mut parts = dirs;
            parts.push(file);
            parts.join("/")
        })
}

fn tree() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map(file_path(), prop::collection::vec(any::<u8>(), 0..64), 0..24)
}

fn is_under_excluded(path: &str, excluded: &BTreeSet<String>) -> bool {
    let segments: Vec<&str> = path.split('/').collect();
    segments[..segments.len() - 1]
        .iter()
        .any(|segment| excluded.contains(*segment))
}

fn archive_tree(
    files: &BTreeMap<String, Vec<u8>>,
    excluded: &BTreeSet<String>,
) -> BTreeMap<String, Vec<u8>> {
    let source = TempDir::new().expect("failed to create temp dir");
    let out = TempDir::new().expect("failed to create temp dir");
    let pairs: Vec<(&str, &[u8])> = files
        .iter()
        .map(|(path, content)| (path.as_str(), content.as_slice()))
        .collect();
    write_tree(source.path(), &pairs);

    let destination = out.path().join("out.zip");
    let config =
        ArchiveConfig::new(source.path(), &destination).with_excludes(excluded.iter().cloned());
    Archiver::new(config).archive().expect("archiving failed");

    read_zip_entries(&destination)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// The archive holds exactly the files not under a default-excluded
    /// directory, with identical bytes.
    #[test]
    fn prop_entries_match_unexcluded_files(files in tree()) {
        let excluded: BTreeSet<String> =
            ["node_modules", ".git"].iter().map(|s| (*s).to_string()).collect();

        let archived = archive_tree(&files, &excluded);

        let expected: BTreeMap<String, Vec<u8>> = files
            .into_iter()
            .filter(|(path, _)| !is_under_excluded(path, &excluded))
            .collect();
        prop_assert_eq!(archived, expected);
    }

    /// Any exclusion set is honored, including the empty one.
    #[test]
    fn prop_custom_exclusion_sets(
        files in tree(),
        excluded in prop::collection::btree_set(
            prop::sample::select(vec![
                "node_modules".to_string(),
                ".git".to_string(),
                "dist".to_string(),
            ]),
            0..=3,
        ),
    ) {
        let archived = archive_tree(&files, &excluded);

        for name in archived.keys() {
            prop_assert!(!is_under_excluded(name, &excluded), "{} should be pruned", name);
        }
        let expected_count = files
            .keys()
            .filter(|path| !is_under_excluded(path, &excluded))
            .count();
        prop_assert_eq!(archived.len(), expected_count);
    }
}
