//! Image host uploader.
//!
//! Receipts are re-hosted so the ledger keeps a link that outlives the
//! provider's ~1 h download window; the OCR call uses the same link.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::mime_detect::mime_for_filename;

/// Uploads image bytes and returns a stable public link.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, filename: &str, data: Bytes) -> Result<String>;
}

/// Multipart-POST uploader against the configured host endpoint.
pub struct HttpImageHost {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpImageHost {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

/// Hosts answer either `{ "data": { "url": ... } }` or a flat `{ "url": ... }`.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    data: Option<UploadData>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: String,
}

impl UploadResponse {
    fn into_url(self) -> Option<String> {
        self.data.map(|d| d.url).or(self.url)
    }
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn upload(&self, filename: &str, data: Bytes) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(data.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime_for_filename(filename))?;
        let form = reqwest::multipart::Form::new()
            .text("key", self.api_key.clone())
            .part("image", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Image host upload failed with status {}",
                response.status()
            ));
        }

        let body: UploadResponse = response.json().await?;
        let url = body
            .into_url()
            .ok_or_else(|| anyhow!("Image host response carried no URL"))?;
        info!(link = %url, "Image re-hosted");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_response_prefers_nested_data() {
        let nested: UploadResponse =
            serde_json::from_str(r#"{"data": {"url": "https://img/a.png"}}"#).unwrap();
        assert_eq!(nested.into_url().as_deref(), Some("https://img/a.png"));

        let flat: UploadResponse =
            serde_json::from_str(r#"{"url": "https://img/b.png"}"#).unwrap();
        assert_eq!(flat.into_url().as_deref(), Some("https://img/b.png"));

        let empty: UploadResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(empty.into_url().is_none());
    }
}
