//! `recibo-ocr` — OCR service client.
//!
//! Converts a hosted receipt image into raw text. The service answers
//! `{"ParsedResults": [{"ParsedText": ...}]}`; a response without parsed
//! results is an empty text, never an error: receipts with unreadable
//! images still flow through the pipeline and get recorded as invalid.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Turns an image URL into raw recognized text.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image_url: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(rename = "ParsedResults", default)]
    parsed_results: Vec<ParsedResult>,
}

#[derive(Debug, Deserialize)]
struct ParsedResult {
    #[serde(rename = "ParsedText", default)]
    parsed_text: String,
}

impl OcrResponse {
    fn into_text(mut self) -> String {
        if self.parsed_results.is_empty() {
            return String::new();
        }
        self.parsed_results.swap_remove(0).parsed_text
    }
}

/// Client for the hosted OCR endpoint (multipart form POST).
pub struct OcrSpaceClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    language: String,
    engine: u8,
}

impl OcrSpaceClient {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        language: impl Into<String>,
        engine: u8,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            language: language.into(),
            engine,
        }
    }
}

#[async_trait]
impl TextRecognizer for OcrSpaceClient {
    async fn recognize(&self, image_url: &str) -> Result<String> {
        let form = reqwest::multipart::Form::new()
            .text("apikey", self.api_key.clone())
            .text("url", image_url.to_string())
            .text("language", self.language.clone())
            .text("OCREngine", self.engine.to_string());

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!("OCR service answered {}", response.status()));
        }

        let body: OcrResponse = response.json().await?;
        let text = body.into_text();
        debug!(image_url, text_len = text.len(), "OCR text received");
        Ok(text)
    }
}
