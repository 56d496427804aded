//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive
//! events as the converter loop works through the directory.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a terminal progress bar, a log file, or a GUI
//! without the library knowing anything about how the host application
//! communicates. The trait is `Send + Sync` so implementations stay usable
//! if a caller drives the batch from a spawned task.

use std::sync::Arc;

/// Called by the converter loop as it processes each candidate file.
///
/// The loop is sequential, so events for one file never interleave with
/// another's. All methods have default no-op implementations so callers
/// only override what they care about.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after the directory scan, before any conversion.
    ///
    /// `total` is the number of candidate files found (including those that
    /// will be skipped at the idempotency gate).
    fn on_scan_complete(&self, total: usize) {
        let _ = total;
    }

    /// Called when a candidate's output already exists and it is skipped.
    fn on_file_skipped(&self, file: &str) {
        let _ = file;
    }

    /// Called just before a file is submitted to the OCR service.
    fn on_file_start(&self, file: &str, index: usize, total: usize) {
        let _ = (file, index, total);
    }

    /// Called when a file converted successfully.
    ///
    /// `bytes_written` is the size of the Markdown output.
    fn on_file_complete(&self, file: &str, bytes_written: usize) {
        let _ = (file, bytes_written);
    }

    /// Called when a file failed; the loop continues with the next file.
    fn on_file_error(&self, file: &str, error: String) {
        let _ = (file, error);
    }

    /// Called once after every candidate has been handled.
    fn on_batch_complete(&self, processed: usize, skipped: usize, errored: usize) {
        let _ = (processed, skipped, errored);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        skips: AtomicUsize,
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl BatchProgressCallback for TrackingCallback {
        fn on_file_skipped(&self, _file: &str) {
            self.skips.fetch_add(1, Ordering::SeqCst);
        }
        fn on_file_start(&self, _file: &str, _index: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }
        fn on_file_complete(&self, _file: &str, _bytes: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_file_error(&self, _file: &str, _error: String) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_scan_complete(3);
        cb.on_file_skipped("b.png");
        cb.on_file_start("a.pdf", 1, 3);
        cb.on_file_complete("a.pdf", 1024);
        cb.on_file_error("c.pdf", "boom".to_string());
        cb.on_batch_complete(1, 1, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            skips: AtomicUsize::new(0),
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
        };

        tracker.on_file_skipped("b.png");
        tracker.on_file_start("a.pdf", 1, 2);
        tracker.on_file_complete("a.pdf", 512);
        tracker.on_file_start("c.pdf", 2, 2);
        tracker.on_file_error("c.pdf", "HTTP 500".to_string());

        assert_eq!(tracker.skips.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn BatchProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_scan_complete(10);
        cb.on_file_start("doc.pdf", 1, 10);
        cb.on_file_complete("doc.pdf", 2048);
    }
}
