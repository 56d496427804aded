//! Configuration types for a batch OCR run.
//!
//! All batch behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`] and never mutated afterwards. The original design
//! note stands: the embedding flag and the extension set are run-level
//! configuration handed to the converter loop at startup, not module-level
//! mutable state.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest, and gives `build()` a place to validate
//! cross-field constraints before any file or network I/O happens.

use crate::engine::OcrEngine;
use crate::error::Ocr2MdError;
use crate::progress::ProgressCallback;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for one batch conversion run.
///
/// Built via [`BatchConfig::builder()`] or [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use ocr2md::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .root("./scans")
///     .embed_images(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Directory whose files are enumerated. Default: `"."`.
    pub root: PathBuf,

    /// Lowercase extensions (no leading dot) eligible for conversion.
    /// Default: `pdf, png, jpg, jpeg, webp`.
    ///
    /// The set drives both filtering and dispatch: `pdf` routes through the
    /// page-wise document path, everything else through the single-image
    /// path. Extensions outside the set are silently ignored, never errors.
    pub extensions: BTreeSet<String>,

    /// Embed base64 image assets extracted from PDF pages into the output
    /// Markdown. Default: false.
    ///
    /// Applies to PDFs only. Standalone images always contribute text only;
    /// re-embedding a source image into its own transcription is noise.
    pub embed_images: bool,

    /// OCR model identifier sent with each request.
    /// Default: `mistral-ocr-latest`.
    pub model: String,

    /// API credential. If `None`, the engine reads `MISTRAL_API_KEY` from
    /// the environment at startup; a key available neither way aborts the
    /// run before any file is touched.
    pub api_key: Option<String>,

    /// Per-request timeout in seconds. Default: 120.
    ///
    /// Applied at the HTTP-client level, so it bounds every protocol stage
    /// (upload, signed URL, OCR, delete) individually, not the whole file.
    pub api_timeout_secs: u64,

    /// Pre-constructed OCR engine. Takes precedence over `api_key`/`model`.
    /// Used by tests to stub out the network.
    pub engine: Option<Arc<dyn OcrEngine>>,

    /// Per-file progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extensions: Self::default_extensions(),
            embed_images: false,
            model: crate::engine::mistral::DEFAULT_MODEL.to_string(),
            api_key: None,
            api_timeout_secs: 120,
            engine: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("root", &self.root)
            .field("extensions", &self.extensions)
            .field("embed_images", &self.embed_images)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("engine", &self.engine.as_ref().map(|_| "<dyn OcrEngine>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }

    /// The supported-extension set used when none is configured.
    pub fn default_extensions() -> BTreeSet<String> {
        ["pdf", "png", "jpg", "jpeg", "webp"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Builder for [`BatchConfig`].
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Replace the supported-extension set. Entries are normalised to
    /// lowercase with any leading dot stripped, so `".PDF"` and `"pdf"`
    /// are the same extension.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn embed_images(mut self, v: bool) -> Self {
        self.config.embed_images = v;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.engine = Some(engine);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, Ocr2MdError> {
        let c = &self.config;
        if c.extensions.is_empty() {
            return Err(Ocr2MdError::InvalidConfig(
                "Supported-extension set must not be empty".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(Ocr2MdError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if c.model.is_empty() {
            return Err(Ocr2MdError::InvalidConfig("Model must not be empty".into()));
        }
        Ok(self.config)
    }
}
