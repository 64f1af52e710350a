//! Image download from the provider's time-limited URLs.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

/// Downloads raw image bytes from a download URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}

/// Plain HTTP pass-through fetcher.
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Image download failed with status {}",
                response.status()
            ));
        }
        let bytes = response.bytes().await?;
        debug!(size = bytes.len(), "Downloaded attachment image");
        Ok(bytes)
    }
}
