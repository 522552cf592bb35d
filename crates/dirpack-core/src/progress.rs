//! Progress reporting for archive creation.
//!
//! The archiver never prints. Callers that want feedback pass a
//! `ProgressCallback`; everything else uses `NoopProgress`.
//!
//! # Components
//!
//! - **`ProgressCallback`**: observer invoked per entry and on completion
//! - **`ProgressTracker`**: numbers entries as they are reported
//! - **`ProgressReader`**: wrapper reader that reports bytes read in batches

use std::io::Read;

/// Observer of an archiving run.
///
/// Callbacks are invoked at these points:
///
/// - `on_entry_start`: before an entry's bytes are written
/// - `on_bytes_written`: while copying, in batches
/// - `on_entry_complete`: after an entry has been fully written
/// - `on_complete`: once, after the archive is finalized
///
/// # Examples
///
/// ```
/// use dirpack_core::ProgressCallback;
///
/// struct PrintProgress;
///
/// impl ProgressCallback for PrintProgress {
///     fn on_entry_start(&mut self, name: &str, total: usize, current: usize) {
///         println!("[{current}/{total}] Adding: {name}");
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, _name: &str) {}
///
///     fn on_complete(&mut self) {
///         println!("Archive created");
///     }
/// }
/// ```
pub trait ProgressCallback {
    /// Called before an entry is written. `current` is 1-based.
    fn on_entry_start(&mut self, name: &str, total: usize, current: usize);

    /// Called with the number of source bytes copied since the last call.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called after an entry has been written.
    fn on_entry_complete(&mut self, name: &str);

    /// Called once when the archive has been finalized.
    fn on_complete(&mut self);
}

/// Progress callback that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _name: &str, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _name: &str) {}

    fn on_complete(&mut self) {}
}

/// Forwards events to a `ProgressCallback`, counting entries.
pub struct ProgressTracker<'a> {
    progress: &'a mut dyn ProgressCallback,
    /// Current entry number (1-indexed for user display)
    current_entry: usize,
    total_entries: usize,
}

impl<'a> ProgressTracker<'a> {
    /// Creates a tracker for a run of `total_entries` entries.
    #[must_use]
    pub fn new(progress: &'a mut dyn ProgressCallback, total_entries: usize) -> Self {
        Self {
            progress,
            current_entry: 0,
            total_entries,
        }
    }

    /// Reports that an entry is starting and advances the counter.
    pub fn on_entry_start(&mut self, name: &str) {
        self.current_entry += 1;
        self.progress
            .on_entry_start(name, self.total_entries, self.current_entry);
    }

    /// Reports that an entry has been written.
    pub fn on_entry_complete(&mut self, name: &str) {
        self.progress.on_entry_complete(name);
    }

    /// Reports that the whole run finished. Call exactly once.
    pub fn on_complete(&mut self) {
        self.progress.on_complete();
    }

    /// Wraps `inner` so that bytes read from it are reported.
    pub fn reader<R: Read>(&mut self, inner: R) -> ProgressReader<'_, R> {
        ProgressReader::new(inner, &mut *self.progress)
    }

    /// Number of entries reported so far.
    #[must_use]
    pub fn current_entry(&self) -> usize {
        self.current_entry
    }
}

/// Wrapper reader that reports bytes read to a progress callback.
///
/// Bytes are accumulated and reported once the batch threshold (default
/// 1 MiB) is reached, and flushed when the reader is dropped.
pub struct ProgressReader<'a, R> {
    inner: R,
    progress: &'a mut dyn ProgressCallback,
    bytes_since_last_update: u64,
    batch_threshold: u64,
}

impl<'a, R> ProgressReader<'a, R> {
    /// Creates a reader with the default 1 MiB batch threshold.
    #[must_use]
    pub fn new(inner: R, progress: &'a mut dyn ProgressCallback) -> Self {
        Self::with_batch_threshold(inner, progress, 1024 * 1024)
    }

    /// Creates a reader that reports every `batch_threshold` bytes.
    #[must_use]
    pub fn with_batch_threshold(
        inner: R,
        progress: &'a mut dyn ProgressCallback,
        batch_threshold: u64,
    ) -> Self {
        Self {
            inner,
            progress,
            bytes_since_last_update: 0,
            batch_threshold,
        }
    }

    /// Reports any accumulated bytes now.
    pub fn flush_progress(&mut self) {
        if self.bytes_since_last_update > 0 {
            self.progress.on_bytes_written(self.bytes_since_last_update);
            self.bytes_since_last_update = 0;
        }
    }
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let bytes_read = self.inner.read(buf)?;
        if bytes_read > 0 {
            self.bytes_since_last_update += bytes_read as u64;
            if self.bytes_since_last_update >= self.batch_threshold {
                self.flush_progress();
            }
        }
        Ok(bytes_read)
    }
}

impl<R> Drop for ProgressReader<'_, R> {
    fn drop(&mut self) {
        self.flush_progress();
    }
}
