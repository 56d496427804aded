//! # ocr2md
//!
//! Batch-convert PDF and image files to Markdown via the Mistral OCR API.
//!
//! ## Why this crate?
//!
//! Local PDF-to-text tools fail on scans, photographs, and complex layouts.
//! This crate delegates the hard part to a hosted OCR model and keeps the
//! plumbing honest: walk a directory, skip what is already converted, send
//! each remaining file to the service, write the result next to the source
//! as `<basename>.md`, and report what happened. Re-running it over the
//! same directory is cheap and safe — an existing `.md` file is the marker
//! that its source is done.
//!
//! ## Pipeline Overview
//!
//! ```text
//! directory
//!  │
//!  ├─ 1. Scan      filter by extension, derive output paths
//!  ├─ 2. Gate      skip candidates whose .md already exists
//!  ├─ 3. OCR       PDFs: upload → signed URL → page-wise OCR
//!  │               images: inline base64 data-URL request
//!  ├─ 4. Assemble  join pages, optionally embed extracted images
//!  ├─ 5. Clean     whitespace / line-ending normalisation
//!  └─ 6. Write     atomic write of <basename>.md + run summary
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ocr2md::{run_batch, BatchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential read from MISTRAL_API_KEY
//!     let config = BatchConfig::builder()
//!         .root("./scans")
//!         .embed_images(true)
//!         .build()?;
//!     let summary = run_batch(&config).await?;
//!     println!(
//!         "{} converted, {} skipped, {} failed",
//!         summary.processed_count(),
//!         summary.skipped_count(),
//!         summary.error_count()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ocr2md` binary (clap + anyhow + dotenvy + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! ocr2md = { version = "0.3", default-features = false }
//! ```
//!
//! ## Failure model
//!
//! One bad file never aborts the batch: per-file errors (unreadable source,
//! remote failure, write failure) are recorded in the
//! [`RunSummary`] and the loop continues. Only run-level
//! conditions — missing credential, unreadable directory — return `Err`.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod summary;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::run_batch;
pub use config::{BatchConfig, BatchConfigBuilder};
pub use engine::mistral::MistralOcr;
pub use engine::{OcrDocument, OcrEngine, OcrImageAsset, OcrPage};
pub use error::{FileError, Ocr2MdError, OcrApiError};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use summary::{FileFailure, RunSummary};
