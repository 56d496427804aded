//! The remote OCR service boundary.
//!
//! The service is an opaque external collaborator: it receives file bytes
//! (classified by MIME-equivalent type) and returns ordered page texts with
//! optional image assets, or an error. [`OcrEngine`] models exactly that
//! contract and nothing more.
//!
//! Keeping the boundary behind a trait lets callers swap the real HTTP
//! client ([`mistral::MistralOcr`]) for a stub in tests, and lets the batch
//! loop stay ignorant of the wire protocol (upload/signed-URL handshake,
//! auth headers, JSON shapes).

pub mod mistral;

use crate::error::OcrApiError;
use serde::{Deserialize, Serialize};

/// One extracted image asset belonging to a page.
///
/// `image_base64` is `None` unless the request asked for image payloads
/// (`include_images = true` on a PDF call).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrImageAsset {
    /// Placeholder identifier as it appears in the page Markdown,
    /// e.g. `img-0.jpeg`.
    pub id: String,
    /// Base64 payload, or a full `data:` URL, depending on service version.
    #[serde(default)]
    pub image_base64: Option<String>,
}

/// One page of OCR output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrPage {
    /// 0-indexed page number as assigned by the service.
    pub index: usize,
    /// Extracted text as Markdown.
    pub markdown: String,
    /// Image assets extracted from this page, in page order.
    #[serde(default)]
    pub images: Vec<OcrImageAsset>,
}

/// The full OCR result for one document.
///
/// Transient: held only for the duration of one file's conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrDocument {
    /// Ordered pages. A single image submission yields exactly one page.
    pub pages: Vec<OcrPage>,
    /// Model identifier echoed back by the service, when present.
    #[serde(default)]
    pub model: Option<String>,
}

impl OcrDocument {
    /// True when no page carries any extracted text.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.markdown.trim().is_empty())
    }
}

/// Async boundary implemented by each OCR backend.
///
/// Exactly one request attempt per call — retry policy is out of scope for
/// this crate, callers that need one wrap the engine.
#[async_trait::async_trait]
pub trait OcrEngine: Send + Sync {
    /// Submit a PDF for page-wise OCR.
    ///
    /// `include_images` asks the service to return base64 payloads for the
    /// image assets it extracts from each page.
    async fn process_pdf(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        include_images: bool,
    ) -> Result<OcrDocument, OcrApiError>;

    /// Submit a standalone image as a single-document OCR request.
    ///
    /// Image payloads are never requested on this path; only the extracted
    /// text matters for standalone images.
    async fn process_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<OcrDocument, OcrApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_deserialises_from_service_shape() {
        let json = r##"{
            "pages": [
                {
                    "index": 0,
                    "markdown": "# Title\n\nBody text.",
                    "images": [
                        {"id": "img-0.jpeg", "image_base64": "aGVsbG8="}
                    ]
                },
                {"index": 1, "markdown": "Second page."}
            ],
            "model": "mistral-ocr-latest"
        }"##;

        let doc: OcrDocument = serde_json::from_str(json).expect("valid response shape");
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[0].index, 0);
        assert_eq!(doc.pages[0].images.len(), 1);
        assert_eq!(doc.pages[0].images[0].id, "img-0.jpeg");
        assert!(doc.pages[1].images.is_empty(), "missing images defaults to empty");
        assert_eq!(doc.model.as_deref(), Some("mistral-ocr-latest"));
    }

    #[test]
    fn image_base64_may_be_null() {
        let json = r#"{
            "pages": [
                {
                    "index": 0,
                    "markdown": "text",
                    "images": [{"id": "img-0.jpeg", "image_base64": null}]
                }
            ]
        }"#;
        let doc: OcrDocument = serde_json::from_str(json).expect("null payload is valid");
        assert!(doc.pages[0].images[0].image_base64.is_none());
    }

    #[test]
    fn is_empty_ignores_whitespace_pages() {
        let doc = OcrDocument {
            pages: vec![OcrPage {
                index: 0,
                markdown: "  \n\t".into(),
                images: vec![],
            }],
            model: None,
        };
        assert!(doc.is_empty());

        let doc = OcrDocument {
            pages: vec![OcrPage {
                index: 0,
                markdown: "content".into(),
                images: vec![],
            }],
            model: None,
        };
        assert!(!doc.is_empty());
    }
}
