//! Create command implementation.

use super::settings;
use super::settings::FileConfig;
use crate::cli::CreateArgs;
use crate::error::convert_archive_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use crate::progress::EntryLog;
use anyhow::Result;
use dirpack_core::Archiver;
use dirpack_core::NoopProgress;
use dirpack_core::ProgressCallback;

/// Runs `create`. `silent` disables per-entry output and the progress bar.
pub fn execute(
    args: &CreateArgs,
    formatter: &dyn OutputFormatter,
    verbose: bool,
    silent: bool,
) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = settings::resolve(args, file_config)?;

    formatter.format_start(&config.destination);

    let mut progress: Box<dyn ProgressCallback + '_> = if silent {
        Box::new(NoopProgress)
    } else if !verbose && CliProgress::should_show() {
        Box::new(CliProgress::new())
    } else {
        Box::new(EntryLog::new(formatter))
    };

    let archiver = Archiver::new(config);
    let report = archiver
        .archive_with_progress(progress.as_mut())
        .map_err(|e| convert_archive_error(e, archiver.config()))?;
    drop(progress);

    formatter.format_archive_result(&archiver.config().destination, &report)
}
