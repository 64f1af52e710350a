use serde::{Deserialize, Serialize};

/// A confirmed attachment as reported by the inbox provider.
///
/// Download URLs are time-limited (roughly one hour), so descriptors are
/// consumed immediately after resolution and never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl AttachmentDescriptor {
    /// Whether the provider has materialized a usable download URL.
    pub fn has_download_url(&self) -> bool {
        self.download_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}
