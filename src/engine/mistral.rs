//! Mistral OCR API client.
//!
//! ## Protocol
//!
//! The service exposes two submission paths, and they differ on purpose:
//!
//! * **PDF** — documents can be tens of megabytes, so they go through the
//!   file store: upload (`POST /v1/files`, `purpose=ocr`), fetch a signed
//!   URL (`GET /v1/files/{id}/url`), then reference that URL in the OCR
//!   request as a `document_url`. The uploaded file is deleted afterwards
//!   regardless of whether OCR succeeded, so failed runs don't accumulate
//!   server-side storage.
//! * **Image** — single images fit comfortably in a request body, so they
//!   are inlined as a base64 `data:` URL in an `image_url` document.
//!
//! Auth is a Bearer token on every request. Each HTTP call gets exactly one
//! attempt; transient failures surface as [`OcrApiError`] for the batch
//! loop to record.

use crate::error::{Ocr2MdError, OcrApiError};
use crate::engine::{OcrDocument, OcrEngine};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "MISTRAL_API_KEY";

/// Default OCR model.
pub const DEFAULT_MODEL: &str = "mistral-ocr-latest";

const DEFAULT_BASE_URL: &str = "https://api.mistral.ai";

/// How much of an error response body to keep in error messages.
const ERROR_BODY_LIMIT: usize = 300;

/// HTTP client for the Mistral OCR endpoints.
#[derive(Debug)]
pub struct MistralOcr {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    id: String,
}

#[derive(Deserialize)]
struct SignedUrlResponse {
    #[serde(default, alias = "signed_url")]
    url: Option<String>,
}

impl MistralOcr {
    /// Create a client with an explicit API key.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, Ocr2MdError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Ocr2MdError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Ocr2MdError::ClientBuildFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: model.into(),
        })
    }

    /// Create a client with the key from the `MISTRAL_API_KEY` environment
    /// variable.
    pub fn from_env(model: impl Into<String>, timeout_secs: u64) -> Result<Self, Ocr2MdError> {
        let key = std::env::var(API_KEY_ENV).unwrap_or_default();
        Self::new(key, model, timeout_secs)
    }

    /// Point the client at a different service root (testing, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Upload file bytes to the service file store; returns the file id.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, OcrApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .text("purpose", "ocr")
            .part("file", part);

        let resp = self
            .http
            .post(format!("{}/v1/files", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| OcrApiError::transport("upload", e))?;
        let resp = check_status("upload", resp).await?;

        let uploaded: UploadResponse = resp
            .json()
            .await
            .map_err(|e| OcrApiError::MalformedResponse {
                stage: "upload",
                detail: e.to_string(),
            })?;

        debug!("Uploaded '{}' as file id {}", file_name, uploaded.id);
        Ok(uploaded.id)
    }

    /// Fetch a short-lived download URL for an uploaded file.
    async fn signed_url(&self, file_id: &str) -> Result<String, OcrApiError> {
        let resp = self
            .http
            .get(format!("{}/v1/files/{}/url", self.base_url, file_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| OcrApiError::transport("signed-url", e))?;
        let resp = check_status("signed-url", resp).await?;

        let signed: SignedUrlResponse =
            resp.json()
                .await
                .map_err(|e| OcrApiError::MalformedResponse {
                    stage: "signed-url",
                    detail: e.to_string(),
                })?;

        signed.url.ok_or(OcrApiError::MissingSignedUrl)
    }

    /// Delete an uploaded file. Best-effort: failures are logged, not returned.
    async fn delete_file(&self, file_id: &str) {
        let result = self
            .http
            .delete(format!("{}/v1/files/{}", self.base_url, file_id))
            .bearer_auth(&self.api_key)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => {
                debug!("Deleted uploaded file {}", file_id);
            }
            Ok(resp) => warn!(
                "Could not delete uploaded file {}: HTTP {}",
                file_id,
                resp.status()
            ),
            Err(e) => warn!("Could not delete uploaded file {}: {}", file_id, e),
        }
    }

    /// Run the OCR request proper against a prepared `document` descriptor.
    async fn run_ocr(
        &self,
        document: serde_json::Value,
        include_images: bool,
    ) -> Result<OcrDocument, OcrApiError> {
        let body = json!({
            "model": self.model,
            "document": document,
            "include_image_base64": include_images,
        });

        let resp = self
            .http
            .post(format!("{}/v1/ocr", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OcrApiError::transport("ocr", e))?;
        let resp = check_status("ocr", resp).await?;

        resp.json()
            .await
            .map_err(|e| OcrApiError::MalformedResponse {
                stage: "ocr",
                detail: e.to_string(),
            })
    }
}

#[async_trait::async_trait]
impl OcrEngine for MistralOcr {
    async fn process_pdf(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        include_images: bool,
    ) -> Result<OcrDocument, OcrApiError> {
        let file_id = self.upload(file_name, bytes).await?;

        // The uploaded file must be cleaned up on every path after this
        // point, including signed-URL and OCR failures.
        let url = match self.signed_url(&file_id).await {
            Ok(url) => url,
            Err(e) => {
                self.delete_file(&file_id).await;
                return Err(e);
            }
        };

        let result = self
            .run_ocr(
                json!({"type": "document_url", "document_url": url}),
                include_images,
            )
            .await;

        self.delete_file(&file_id).await;
        result
    }

    async fn process_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<OcrDocument, OcrApiError> {
        debug!("Encoding '{}' ({} bytes) as {}", file_name, bytes.len(), mime);
        let data_url = image_data_url(mime, &bytes);
        self.run_ocr(json!({"type": "image_url", "image_url": data_url}), false)
            .await
    }
}

/// Build a `data:<mime>;base64,…` URL from raw image bytes.
pub(crate) fn image_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Map a non-success response to `OcrApiError::Status` with a body snippet.
async fn check_status(
    stage: &'static str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, OcrApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let detail = if body.len() > ERROR_BODY_LIMIT {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < ERROR_BODY_LIMIT)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}\u{2026}", &body[..cut])
    } else {
        body
    };

    Err(OcrApiError::Status {
        stage,
        status: status.as_u16(),
        detail,
    })
}
