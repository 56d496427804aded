//! The file converter loop: batch entry point and per-file conversion.
//!
//! [`run_batch`] is the primary entry point for the library. It is
//! deliberately sequential — one file at a time, one blocking await per
//! remote call. The interesting guarantees are about isolation, not speed:
//! a failed file is recorded and the loop moves on, and a failed file never
//! leaves a partial output behind (the write is temp-file + rename), so the
//! next run will simply try it again.

use crate::config::BatchConfig;
use crate::engine::mistral::MistralOcr;
use crate::engine::OcrEngine;
use crate::error::{FileError, Ocr2MdError};
use crate::pipeline::scan::{self, Candidate, SourceKind};
use crate::pipeline::{assemble, postprocess};
use crate::summary::RunSummary;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert every eligible, not-yet-converted file under `config.root`.
///
/// # Returns
/// `Ok(RunSummary)` even if some files failed — check
/// [`RunSummary::has_errors`]. Per-file failures never abort the batch.
///
/// # Errors
/// Returns `Err(Ocr2MdError)` only for fatal conditions:
/// - no API key configured (and no engine override)
/// - the directory cannot be listed
pub async fn run_batch(config: &BatchConfig) -> Result<RunSummary, Ocr2MdError> {
    let start = Instant::now();

    // Engine first: a missing credential must abort before any file I/O.
    let engine = resolve_engine(config)?;

    info!("Starting OCR batch in {}", config.root.display());
    debug!("Embed PDF images: {}", config.embed_images);

    let candidates = scan::scan_directory(&config.root, &config.extensions)?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_scan_complete(candidates.len());
    }

    if candidates.is_empty() {
        info!("No supported files found in {}", config.root.display());
        return Ok(RunSummary::default());
    }

    let total = candidates.len();
    let mut summary = RunSummary::default();

    for (i, candidate) in candidates.iter().enumerate() {
        // Idempotency gate: output existence is the only marker consulted.
        if candidate.output_exists() {
            info!(
                "Skipping {}: {} already exists",
                candidate.file_name,
                candidate.output_path.display()
            );
            summary.record_skipped(&candidate.file_name);
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_skipped(&candidate.file_name);
            }
            continue;
        }

        if let Some(ref cb) = config.progress_callback {
            cb.on_file_start(&candidate.file_name, i + 1, total);
        }

        match convert_file(engine.as_ref(), candidate, config).await {
            Ok(bytes_written) => {
                info!(
                    "Converted {} → {} ({} bytes)",
                    candidate.file_name,
                    candidate.output_path.display(),
                    bytes_written
                );
                summary.record_processed(&candidate.file_name);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_complete(&candidate.file_name, bytes_written);
                }
            }
            Err(e) => {
                warn!("{}: {}", candidate.file_name, e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_error(&candidate.file_name, e.to_string());
                }
                summary.record_error(&candidate.file_name, e.to_string());
            }
        }
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(
            summary.processed_count(),
            summary.skipped_count(),
            summary.error_count(),
        );
    }

    info!(
        "Batch complete: {} processed, {} skipped, {} errored in {}ms",
        summary.processed_count(),
        summary.skipped_count(),
        summary.error_count(),
        start.elapsed().as_millis()
    );

    Ok(summary)
}

/// Resolve the OCR engine, from most-specific to least-specific.
///
/// 1. **Pre-built engine** (`config.engine`) — the caller constructed it
///    entirely; used as-is. This is how tests stub out the network.
/// 2. **Explicit key** (`config.api_key`) — build a [`MistralOcr`] client
///    with it.
/// 3. **Environment** — read `MISTRAL_API_KEY`; absence is fatal.
fn resolve_engine(config: &BatchConfig) -> Result<Arc<dyn OcrEngine>, Ocr2MdError> {
    if let Some(ref engine) = config.engine {
        return Ok(Arc::clone(engine));
    }

    let client = match config.api_key {
        Some(ref key) => MistralOcr::new(key.as_str(), config.model.as_str(), config.api_timeout_secs)?,
        None => MistralOcr::from_env(config.model.as_str(), config.api_timeout_secs)?,
    };
    Ok(Arc::new(client))
}

/// Convert one candidate: read, OCR, assemble, clean, write.
///
/// Returns the byte length of the written Markdown. Every failure mode maps
/// to a [`FileError`] so the loop can record it and continue.
async fn convert_file(
    engine: &dyn OcrEngine,
    candidate: &Candidate,
    config: &BatchConfig,
) -> Result<usize, FileError> {
    let bytes = tokio::fs::read(&candidate.path)
        .await
        .map_err(|e| FileError::Read {
            path: candidate.path.clone(),
            source: e,
        })?;
    if bytes.is_empty() {
        return Err(FileError::Empty {
            path: candidate.path.clone(),
        });
    }

    let (doc, embed) = match candidate.kind {
        SourceKind::Pdf => {
            debug!("Submitting PDF {} ({} bytes)", candidate.file_name, bytes.len());
            let doc = engine
                .process_pdf(&candidate.file_name, bytes, config.embed_images)
                .await?;
            (doc, config.embed_images)
        }
        SourceKind::Image { mime } => {
            debug!("Submitting image {} as {}", candidate.file_name, mime);
            let doc = engine
                .process_image(&candidate.file_name, bytes, mime)
                .await?;
            // Standalone images contribute text only, never embedded data.
            (doc, false)
        }
    };

    if doc.is_empty() {
        warn!("OCR returned no text for {}", candidate.file_name);
    }

    let markdown = postprocess::clean_markdown(&assemble::assemble_markdown(&doc, embed));
    write_output(&candidate.output_path, &markdown).await?;
    Ok(markdown.len())
}

/// Atomic write: temp file + rename, so a crash or write failure never
/// leaves a partial `.md` that would pass the idempotency gate next run.
async fn write_output(path: &Path, markdown: &str) -> Result<(), FileError> {
    let tmp_path = path.with_extension("md.tmp");

    tokio::fs::write(&tmp_path, markdown)
        .await
        .map_err(|e| FileError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| FileError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::OcrDocument;
    use crate::error::OcrApiError;

    struct PanicEngine;

    #[async_trait::async_trait]
    impl OcrEngine for PanicEngine {
        async fn process_pdf(
            &self,
            _: &str,
            _: Vec<u8>,
            _: bool,
        ) -> Result<OcrDocument, OcrApiError> {
            panic!("must not be called");
        }
        async fn process_image(
            &self,
            _: &str,
            _: Vec<u8>,
            _: &str,
        ) -> Result<OcrDocument, OcrApiError> {
            panic!("must not be called");
        }
    }

    #[test]
    fn engine_override_wins_over_keys() {
        let config = BatchConfig::builder()
            .engine(Arc::new(PanicEngine))
            .api_key("unused")
            .build()
            .unwrap();
        // Resolution must not construct an HTTP client when an engine is injected.
        assert!(resolve_engine(&config).is_ok());
    }

    #[tokio::test]
    async fn write_output_is_atomic_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("doc.md");

        write_output(&out, "# hi\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "# hi\n");
        assert!(
            !dir.path().join("doc.md.tmp").exists(),
            "temp file must be renamed away"
        );
    }
}
