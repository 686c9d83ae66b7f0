//! Image publishing: upload a page PNG and get back a public URL.
//!
//! Notion's API cannot take image bytes directly for external image blocks;
//! it needs a URL it can fetch. freeimage.host provides one per upload.
//!
//! ## Success condition
//!
//! A URL is returned only when **both** the HTTP status is 2xx **and** the
//! `status_code` embedded in the JSON body is 200. The host answers some
//! rejections (bad key, oversized file) with HTTP 200 and a failing
//! embedded status, so checking only one of the two is not enough.

use crate::error::{Pdf2NotionError, UploadFailure};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Uploads a local image and returns a publicly reachable URL.
#[async_trait]
pub trait ImagePublisher: Send + Sync {
    async fn publish(&self, image: &Path) -> Result<String, UploadFailure>;
}

/// [`ImagePublisher`] backed by the freeimage.host v1 upload API.
#[derive(Debug, Clone)]
pub struct FreeImageHost {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl FreeImageHost {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, Pdf2NotionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|source| Pdf2NotionError::Http {
                service: "image host",
                source,
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ImagePublisher for FreeImageHost {
    async fn publish(&self, image: &Path) -> Result<String, UploadFailure> {
        let bytes = tokio::fs::read(image)
            .await
            .map_err(|e| UploadFailure::ReadFailed {
                path: image.to_path_buf(),
                detail: e.to_string(),
            })?;
        let file_name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "page.png".to_string());
        debug!("Uploading {} ({} bytes)", file_name, bytes.len());

        let form = Form::new()
            .text("key", self.api_key.clone())
            .text("action", "upload")
            .part("source", Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadFailure::Unreachable {
                detail: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| UploadFailure::Unreachable {
                detail: e.to_string(),
            })?;

        interpret_response(status, &body)
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    status_code: u16,
    #[serde(default)]
    status_txt: Option<String>,
    #[serde(default)]
    image: Option<UploadedImage>,
}

#[derive(Debug, Deserialize)]
struct UploadedImage {
    url: String,
}

/// Decide the outcome of an upload from the HTTP status and raw body.
pub fn interpret_response(http_status: u16, body: &str) -> Result<String, UploadFailure> {
    if !(200..300).contains(&http_status) {
        return Err(UploadFailure::Transport {
            status: http_status,
            body: body.to_string(),
        });
    }

    let parsed: UploadResponse =
        serde_json::from_str(body).map_err(|e| UploadFailure::Malformed {
            detail: e.to_string(),
        })?;

    if parsed.status_code != 200 {
        return Err(UploadFailure::Rejected {
            status_code: parsed.status_code,
            status_txt: parsed.status_txt.unwrap_or_default(),
        });
    }

    match parsed.image {
        Some(img) if !img.url.is_empty() => Ok(img.url),
        _ => Err(UploadFailure::Malformed {
            detail: "success response without image.url".into(),
        }),
    }
}
