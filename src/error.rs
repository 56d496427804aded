//! Error types for the ocr2md library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Ocr2MdError`] — **Fatal**: the batch cannot proceed at all (missing
//!   API key, unreadable working directory, invalid configuration).
//!   Returned as `Err(Ocr2MdError)` from [`crate::batch::run_batch`].
//!
//! * [`FileError`] — **Non-fatal**: a single source file failed (unreadable
//!   file, remote-call failure, write failure) but the rest of the batch is
//!   fine. Recorded in [`crate::summary::RunSummary`] so callers see which
//!   files failed instead of losing the whole run to one bad document.
//!
//! [`OcrApiError`] sits below [`FileError`]: it describes what went wrong on
//! the wire when talking to the OCR service and is wrapped into
//! `FileError::Api` by the converter loop.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the ocr2md library.
///
/// Per-file failures use [`FileError`] and are stored in
/// [`crate::summary::RunSummary`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Ocr2MdError {
    /// No API key was configured and none was found in the environment.
    #[error(
        "No OCR API key configured.\nSet MISTRAL_API_KEY in the environment or a local .env file."
    )]
    MissingApiKey,

    /// The directory to scan could not be read at all.
    #[error("Cannot read directory '{path}': {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuildFailed(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single source file.
///
/// Stored in [`crate::summary::FileFailure`] when a file fails.
/// The batch continues with the next file.
#[derive(Debug, Error)]
pub enum FileError {
    /// The source file could not be read.
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source file is empty; the OCR service rejects zero-byte uploads.
    #[error("'{path}' is empty (0 bytes)")]
    Empty { path: PathBuf },

    /// The remote OCR call failed.
    #[error("OCR request failed: {0}")]
    Api(#[from] OcrApiError),

    /// The output Markdown file could not be written.
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Wire-level errors from the OCR service boundary.
///
/// One variant per way the request/response contract can break. There is no
/// retry layer: each request gets a single attempt.
#[derive(Debug, Error)]
pub enum OcrApiError {
    /// Network-level failure (DNS, TLS, timeout, connection reset).
    #[error("transport error during {stage}: {detail}")]
    Transport { stage: &'static str, detail: String },

    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} during {stage}: {detail}")]
    Status {
        stage: &'static str,
        status: u16,
        detail: String,
    },

    /// The response body did not match the expected shape.
    #[error("malformed response during {stage}: {detail}")]
    MalformedResponse { stage: &'static str, detail: String },

    /// The file upload succeeded but no signed URL came back.
    #[error("upload accepted but the signed-URL response contained no URL")]
    MissingSignedUrl,
}

impl OcrApiError {
    /// Wrap a reqwest error that occurred in the given protocol stage.
    pub(crate) fn transport(stage: &'static str, err: reqwest::Error) -> Self {
        OcrApiError::Transport {
            stage,
            detail: err.to_string(),
        }
    }
}
