//! Merges the optional JSON config file with command-line arguments.

use crate::cli::CreateArgs;
use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use dirpack_core::ArchiveConfig;
use dirpack_core::EntryCompression;
use dirpack_core::config::default_excludes;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// Options recognized in a `--config` file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub source_root: Option<PathBuf>,
    pub destination_path: Option<PathBuf>,
    pub exclude: Option<Vec<String>>,
}

impl FileConfig {
    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        serde_json::from_str(&text).with_context(|| {
            format!(
                "Invalid config file '{}'\n\
                 HINT: Expected a JSON object with \"sourceRoot\", \"destinationPath\" and \"exclude\".",
                path.display()
            )
        })
    }
}

/// Builds the archive configuration from `args` and an optional file config.
///
/// Command-line values win over file values. An `exclude` list in the file
/// replaces the default set; `--exclude` names are added on top.
pub fn resolve(args: &CreateArgs, file: FileConfig) -> Result<ArchiveConfig> {
    let source = args.source.clone().or(file.source_root).ok_or_else(|| {
        anyhow!(
            "No source directory given\n\
             HINT: Pass SOURCE or set \"sourceRoot\" in the config file."
        )
    })?;
    let destination = args
        .output
        .clone()
        .or(file.destination_path)
        .ok_or_else(|| {
            anyhow!(
                "No output archive given\n\
                 HINT: Pass OUTPUT or set \"destinationPath\" in the config file."
            )
        })?;

    let mut exclude: BTreeSet<String> = match file.exclude {
        Some(names) => names.into_iter().collect(),
        None if args.no_default_excludes => BTreeSet::new(),
        None => default_excludes(),
    };
    exclude.extend(args.exclude.iter().cloned());

    let mut config = ArchiveConfig::new(source, destination)
        .with_excludes(exclude)
        .with_preserve_permissions(!args.no_permissions);

    if args.store {
        config = config.with_compression(EntryCompression::Stored);
    } else if let Some(level) = args.compression_level {
        config = config.with_compression_level(level);
    }

    Ok(config)
}
