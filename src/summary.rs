//! Run summary: what the batch did, file by file.
//!
//! Constructed fresh for each invocation of [`crate::batch::run_batch`] and
//! discarded when the caller is done with it — there is no processing
//! ledger on disk. The output files themselves are the only persistent
//! record (and the idempotency markers for the next run).

use serde::{Deserialize, Serialize};

/// One failed file with a human-readable reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    /// Source file name.
    pub file: String,
    /// Error description, from [`crate::error::FileError`].
    pub detail: String,
}

/// Counters and file lists for one batch run.
///
/// Serialisable so the CLI can emit it as JSON; the field order mirrors the
/// order the console summary prints in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Files converted and written this run.
    pub processed: Vec<String>,
    /// Files whose output already existed.
    pub skipped: Vec<String>,
    /// Files that failed, with reasons.
    pub errored: Vec<FileFailure>,
}

impl RunSummary {
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn error_count(&self) -> usize {
        self.errored.len()
    }

    /// Total candidates the run looked at.
    pub fn total(&self) -> usize {
        self.processed.len() + self.skipped.len() + self.errored.len()
    }

    /// True when at least one file failed; drives the process exit code.
    pub fn has_errors(&self) -> bool {
        !self.errored.is_empty()
    }

    pub(crate) fn record_processed(&mut self, file: impl Into<String>) {
        self.processed.push(file.into());
    }

    pub(crate) fn record_skipped(&mut self, file: impl Into<String>) {
        self.skipped.push(file.into());
    }

    pub(crate) fn record_error(&mut self, file: impl Into<String>, detail: impl Into<String>) {
        self.errored.push(FileFailure {
            file: file.into(),
            detail: detail.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_track_recorded_files() {
        let mut summary = RunSummary::default();
        summary.record_processed("a.pdf");
        summary.record_skipped("b.png");
        summary.record_error("c.pdf", "HTTP 500 during ocr");

        assert_eq!(summary.processed_count(), 1);
        assert_eq!(summary.skipped_count(), 1);
        assert_eq!(summary.error_count(), 1);
        assert_eq!(summary.total(), 3);
        assert!(summary.has_errors());
    }

    #[test]
    fn empty_summary_has_no_errors() {
        let summary = RunSummary::default();
        assert!(!summary.has_errors());
        assert_eq!(summary.total(), 0);
    }

    #[test]
    fn summary_serialises_to_json() {
        let mut summary = RunSummary::default();
        summary.record_processed("a.pdf");
        summary.record_error("b.png", "unreadable");

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("a.pdf"));
        assert!(json.contains("unreadable"));

        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.processed, vec!["a.pdf"]);
        assert_eq!(back.errored[0].file, "b.png");
    }
}
