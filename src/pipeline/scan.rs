//! Directory scan: find candidate files and derive their output paths.
//!
//! The scan is the gatekeeper for everything downstream: only regular files
//! whose lowercase extension is in the configured set become candidates, so
//! unsupported files never reach the network and existing `.md` outputs are
//! never treated as sources. The output path is the source path with its
//! extension swapped for `md` — its existence is the idempotency marker the
//! batch loop checks before calling the service.

use crate::error::Ocr2MdError;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How a candidate is submitted to the OCR service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Page-wise document OCR via upload + signed URL.
    Pdf,
    /// Single-document image OCR with an inline data URL.
    Image {
        /// MIME type sent with the data URL.
        mime: &'static str,
    },
}

/// One eligible source file plus its derived output path.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Full path of the source file.
    pub path: PathBuf,
    /// File name component, used for display and summary entries.
    pub file_name: String,
    /// PDF or image dispatch.
    pub kind: SourceKind,
    /// Sibling `.md` path the conversion will produce.
    pub output_path: PathBuf,
}

impl Candidate {
    /// The idempotency check: has this source already been converted?
    pub fn output_exists(&self) -> bool {
        self.output_path.exists()
    }
}

/// Classify a path by extension against the supported set.
///
/// Returns `None` for paths with no extension or an extension outside the
/// set — those are silently excluded, not errors.
pub fn classify(path: &Path, extensions: &BTreeSet<String>) -> Option<SourceKind> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    if !extensions.contains(&ext) {
        return None;
    }
    if ext == "pdf" {
        Some(SourceKind::Pdf)
    } else {
        Some(SourceKind::Image {
            mime: mime_for_extension(&ext),
        })
    }
}

/// Enumerate `root` and return candidates sorted by file name.
///
/// Directory-enumeration order is filesystem-dependent; sorting keeps runs
/// and logs deterministic. An unreadable directory is fatal — there is
/// nothing useful a batch can do without a listing.
pub fn scan_directory(
    root: &Path,
    extensions: &BTreeSet<String>,
) -> Result<Vec<Candidate>, Ocr2MdError> {
    let entries = std::fs::read_dir(root).map_err(|e| Ocr2MdError::DirectoryUnreadable {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Ocr2MdError::DirectoryUnreadable {
            path: root.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(kind) = classify(&path, extensions) else {
            continue;
        };
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        let output_path = path.with_extension("md");
        candidates.push(Candidate {
            path,
            file_name,
            kind,
            output_path,
        });
    }

    candidates.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    debug!(
        "Scan of {} found {} candidate file(s)",
        root.display(),
        candidates.len()
    );
    Ok(candidates)
}

/// Map a lowercase image extension to the MIME type sent to the service.
///
/// Unknown extensions fall back to JPEG; the service sniffs the payload
/// anyway, so a wrong label degrades gracefully.
fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "image/jpeg",
    }
}
