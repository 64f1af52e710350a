//! Inbox provider REST client.
//!
//! Wraps the provider's attachment endpoints:
//!   GET /emails/receiving/{email_id}/attachments        — list
//!   GET /emails/receiving/{email_id}/attachments/{id}   — single record
//!
//! The provider is eventually consistent: a 404 on the single-record
//! endpoint means "not materialized yet", not "gone".

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use recibo_core::AttachmentDescriptor;

/// Outcome of fetching one attachment record.
#[derive(Debug)]
pub enum AttachmentFetch {
    /// The provider returned the record.
    Ready(AttachmentDescriptor),
    /// 404: the file has not been materialized upstream yet.
    Pending,
    /// Any other non-success status; terminal for this attachment.
    Failed(u16),
}

/// Read access to the provider's attachment endpoints.
#[async_trait]
pub trait InboxApi: Send + Sync {
    /// List all attachments of a message. `Ok(None)` when the endpoint
    /// answers with a non-success status: "no data", not an error.
    async fn list_attachments(&self, email_id: &str)
        -> Result<Option<Vec<AttachmentDescriptor>>>;

    /// Fetch a single attachment record by id.
    async fn get_attachment(
        &self,
        email_id: &str,
        attachment_id: &str,
    ) -> Result<AttachmentFetch>;
}

/// A first-class provider client (vendor SDK), when one is configured.
/// Unlike the raw REST path, any error here aborts the whole strategy.
#[async_trait]
pub trait InboxSdk: Send + Sync {
    async fn list_attachments(&self, email_id: &str) -> Result<Vec<AttachmentDescriptor>>;
}

/// List endpoints answer `{ "data": [...] }` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListEnvelope {
    Wrapped { data: Vec<AttachmentDescriptor> },
    Bare(Vec<AttachmentDescriptor>),
}

impl ListEnvelope {
    fn into_inner(self) -> Vec<AttachmentDescriptor> {
        match self {
            ListEnvelope::Wrapped { data } => data,
            ListEnvelope::Bare(items) => items,
        }
    }
}

/// Single-record endpoints answer `{ "data": {...} }` or a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemEnvelope {
    Wrapped { data: AttachmentDescriptor },
    Bare(AttachmentDescriptor),
}

impl ItemEnvelope {
    fn into_inner(self) -> AttachmentDescriptor {
        match self {
            ItemEnvelope::Wrapped { data } => data,
            ItemEnvelope::Bare(item) => item,
        }
    }
}

/// Bearer-authenticated REST client against the provider API.
pub struct InboxHttpClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl InboxHttpClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn attachments_url(&self, email_id: &str) -> String {
        format!(
            "{}/emails/receiving/{email_id}/attachments",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl InboxApi for InboxHttpClient {
    async fn list_attachments(
        &self,
        email_id: &str,
    ) -> Result<Option<Vec<AttachmentDescriptor>>> {
        let response = self
            .client
            .get(self.attachments_url(email_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Attachment listing request failed")?;

        if !response.status().is_success() {
            debug!(email_id, status = %response.status(), "Attachment listing returned no data");
            return Ok(None);
        }

        let envelope: ListEnvelope = response
            .json()
            .await
            .context("Failed to parse attachment listing")?;
        Ok(Some(envelope.into_inner()))
    }

    async fn get_attachment(
        &self,
        email_id: &str,
        attachment_id: &str,
    ) -> Result<AttachmentFetch> {
        let url = format!("{}/{attachment_id}", self.attachments_url(email_id));
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Attachment fetch request failed")?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(AttachmentFetch::Pending);
        }
        if !status.is_success() {
            return Ok(AttachmentFetch::Failed(status.as_u16()));
        }

        let envelope: ItemEnvelope = response
            .json()
            .await
            .context("Failed to parse attachment record")?;
        Ok(AttachmentFetch::Ready(envelope.into_inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_envelope_accepts_wrapped_and_bare() {
        let wrapped: ListEnvelope =
            serde_json::from_str(r#"{"data": [{"id": "att_1"}]}"#).unwrap();
        assert_eq!(wrapped.into_inner().len(), 1);

        let bare: ListEnvelope = serde_json::from_str(r#"[{"id": "att_1"}, {"id": "att_2"}]"#).unwrap();
        assert_eq!(bare.into_inner().len(), 2);
    }

    #[test]
    fn item_envelope_accepts_wrapped_and_bare() {
        let wrapped: ItemEnvelope =
            serde_json::from_str(r#"{"data": {"id": "att_1", "download_url": "https://x"}}"#)
                .unwrap();
        assert_eq!(wrapped.into_inner().id.as_deref(), Some("att_1"));

        let bare: ItemEnvelope = serde_json::from_str(r#"{"id": "att_2"}"#).unwrap();
        assert_eq!(bare.into_inner().id.as_deref(), Some("att_2"));
    }

    #[test]
    fn urls_tolerate_trailing_slash() {
        let client = InboxHttpClient::new(
            reqwest::Client::new(),
            "https://api.example.com/",
            "key",
        );
        assert_eq!(
            client.attachments_url("em_1"),
            "https://api.example.com/emails/receiving/em_1/attachments"
        );
    }
}
