//! Pipeline stages for batch OCR conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and keeps the batch
//! loop itself free of string handling and filesystem minutiae.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ ocr ──▶ assemble ──▶ postprocess ──▶ write
//! (dir)   (remote)  (pages+imgs)  (cleanup)      (.md)
//! ```
//!
//! 1. [`scan`] — enumerate the directory, filter by extension, classify
//!    PDF vs. image, derive each candidate's output path
//! 2. ocr — the remote call; lives in [`crate::engine`], the only stage
//!    with network I/O
//! 3. [`assemble`] — join page Markdown in page order, optionally replacing
//!    image placeholders with base64 `data:` URLs
//! 4. [`postprocess`] — deterministic text cleanup of service output
//!    (line endings, whitespace, invisible characters)
//! 5. write — atomic write of the output file; lives in [`crate::batch`]
//!    next to the loop that owns error accounting

pub mod assemble;
pub mod postprocess;
pub mod scan;
