//! Three-strategy attachment resolution.
//!
//! The inbox provider is eventually consistent: right after the webhook
//! fires, the listing endpoints may know nothing about the attachments the
//! event itself announced. Resolution therefore tries, in strict order:
//!
//!   1. a first-class provider client, when configured
//!   2. the raw REST listing endpoint
//!   3. per-attachment retrieval keyed by the event's own stubs, with a
//!      bounded fixed-delay retry on "not materialized yet" (404)
//!
//! Each strategy yields `Option<Vec<_>>` and the first non-empty list wins.
//! All three coming up empty is a normal outcome (spam, text-only mail),
//! not an error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use media::{has_image_extension, is_image};
use recibo_core::{AttachmentDescriptor, AttachmentStub};

use crate::client::{AttachmentFetch, InboxApi, InboxSdk};

/// Additional attempts after the first fetch of a pending attachment.
const RETRY_LIMIT: u32 = 3;

/// Fixed pause between attempts; deliberately not a backoff curve so the
/// worst case stays at `RETRY_LIMIT * RETRY_DELAY` per stub.
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Sleep collaborator, injected so retry tests run without timers.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Resolves the attachments of one inbound message.
pub struct AttachmentResolver {
    sdk: Option<Arc<dyn InboxSdk>>,
    api: Arc<dyn InboxApi>,
    sleeper: Arc<dyn Sleeper>,
}

impl AttachmentResolver {
    pub fn new(api: Arc<dyn InboxApi>) -> Self {
        Self {
            sdk: None,
            api,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Configure a first-class provider client, tried before the REST path.
    pub fn with_sdk(mut self, sdk: Arc<dyn InboxSdk>) -> Self {
        self.sdk = Some(sdk);
        self
    }

    /// Swap the sleep collaborator (tests run with a counting no-op).
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Resolve all attachments of `email_id`, trying each strategy in order.
    /// `None` means no strategy produced anything, and the caller drops the
    /// event without writing a record.
    pub async fn resolve(
        &self,
        email_id: &str,
        stubs: &[AttachmentStub],
    ) -> Option<Vec<AttachmentDescriptor>> {
        if let Some(found) = self.from_sdk(email_id).await {
            debug!(email_id, count = found.len(), "Attachments resolved via provider client");
            return Some(found);
        }

        if let Some(found) = self.from_listing(email_id).await {
            debug!(email_id, count = found.len(), "Attachments resolved via REST listing");
            return Some(found);
        }

        if let Some(found) = self.from_stubs(email_id, stubs).await {
            debug!(email_id, count = found.len(), "Attachments resolved via event stubs");
            return Some(found);
        }

        info!(email_id, "No attachments resolved; dropping event");
        None
    }

    /// Strategy 1: one call through the configured first-class client.
    /// Any reported error aborts the strategy, with no retry.
    async fn from_sdk(&self, email_id: &str) -> Option<Vec<AttachmentDescriptor>> {
        let sdk = self.sdk.as_ref()?;
        match sdk.list_attachments(email_id).await {
            Ok(list) if !list.is_empty() => Some(list),
            Ok(_) => None,
            Err(e) => {
                warn!(email_id, error = %e, "Provider client listing failed; falling through");
                None
            }
        }
    }

    /// Strategy 2: raw REST listing. A non-success status already surfaced
    /// as `Ok(None)` in the client: "no data", not an error path.
    async fn from_listing(&self, email_id: &str) -> Option<Vec<AttachmentDescriptor>> {
        match self.api.list_attachments(email_id).await {
            Ok(Some(list)) if !list.is_empty() => Some(list),
            Ok(_) => None,
            Err(e) => {
                warn!(email_id, error = %e, "REST listing failed; falling through");
                None
            }
        }
    }

    /// Strategy 3: fetch each event-supplied stub individually. Stubs are
    /// independent; one failing never aborts its siblings.
    async fn from_stubs(
        &self,
        email_id: &str,
        stubs: &[AttachmentStub],
    ) -> Option<Vec<AttachmentDescriptor>> {
        if stubs.is_empty() {
            return None;
        }

        let mut found = Vec::new();
        for stub in stubs {
            if let Some(att) = self.fetch_stub_with_retry(email_id, stub).await {
                found.push(att);
            }
        }

        if found.is_empty() { None } else { Some(found) }
    }

    /// Fetch one stub, retrying only the "not materialized yet" case.
    async fn fetch_stub_with_retry(
        &self,
        email_id: &str,
        stub: &AttachmentStub,
    ) -> Option<AttachmentDescriptor> {
        for attempt in 0..=RETRY_LIMIT {
            match self.api.get_attachment(email_id, &stub.id).await {
                Ok(AttachmentFetch::Ready(att)) => {
                    // Records without a usable URL are silently dropped.
                    return att.has_download_url().then_some(att);
                }
                Ok(AttachmentFetch::Pending) => {
                    if attempt < RETRY_LIMIT {
                        self.sleeper.sleep(RETRY_DELAY).await;
                        continue;
                    }
                    debug!(email_id, attachment_id = %stub.id, "Attachment never materialized");
                    return None;
                }
                Ok(AttachmentFetch::Failed(status)) => {
                    warn!(email_id, attachment_id = %stub.id, status, "Attachment fetch failed; skipping");
                    return None;
                }
                Err(e) => {
                    warn!(email_id, attachment_id = %stub.id, error = %e, "Attachment fetch errored; skipping");
                    return None;
                }
            }
        }
        None
    }
}

/// First attachment that looks like an image: filename extension first,
/// then content-type prefix. First match, not best match.
pub fn select_image(attachments: &[AttachmentDescriptor]) -> Option<&AttachmentDescriptor> {
    attachments.iter().find(|att| {
        att.filename
            .as_deref()
            .is_some_and(has_image_extension)
            || att.content_type.as_deref().is_some_and(is_image)
    })
}
