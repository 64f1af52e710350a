use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event type emitted by the inbox provider when a message arrives.
pub const EMAIL_RECEIVED: &str = "email.received";

/// An inbound webhook notification from the inbox provider.
/// Immutable; one per webhook delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEmailEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub data: EmailData,
}

impl InboundEmailEvent {
    pub fn is_email_received(&self) -> bool {
        self.event_type == EMAIL_RECEIVED
    }
}

/// Payload of an `email.received` notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailData {
    pub email_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<CcEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentStub>,
}

impl EmailData {
    /// Sender address recorded on the ledger row; empty when the provider
    /// omitted it.
    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or("")
    }
}

/// A CC recipient: providers send either a bare address string or an
/// object keyed `email` or `address`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CcEntry {
    Plain(String),
    Object {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<String>,
    },
}

impl CcEntry {
    pub fn address(&self) -> Option<&str> {
        match self {
            CcEntry::Plain(s) => Some(s),
            CcEntry::Object { email, address } => {
                email.as_deref().or(address.as_deref())
            }
        }
    }
}

/// Minimal attachment metadata embedded in the webhook event itself.
/// Used as the fallback key set when the listing endpoints yield nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentStub {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_event() {
        let raw = r#"{
            "type": "email.received",
            "data": {
                "email_id": "em_1",
                "from": "payer@example.com",
                "cc": ["audit@example.com", {"email": "boss@example.com"}],
                "attachments": [{"id": "att_1", "filename": "recibo.png", "content_type": "image/png"}]
            }
        }"#;
        let event: InboundEmailEvent = serde_json::from_str(raw).unwrap();
        assert!(event.is_email_received());
        assert_eq!(event.data.email_id, "em_1");
        assert_eq!(event.data.sender(), "payer@example.com");
        assert_eq!(event.data.attachments.len(), 1);
        assert_eq!(event.data.cc[0].address(), Some("audit@example.com"));
        assert_eq!(event.data.cc[1].address(), Some("boss@example.com"));
    }

    #[test]
    fn cc_object_with_address_key() {
        let entry: CcEntry =
            serde_json::from_str(r#"{"address": "cc@example.com"}"#).unwrap();
        assert_eq!(entry.address(), Some("cc@example.com"));
    }

    #[test]
    fn tolerates_missing_optional_fields() {
        let raw = r#"{"type": "email.received", "data": {"email_id": "em_2"}}"#;
        let event: InboundEmailEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.data.sender(), "");
        assert!(event.data.attachments.is_empty());
        assert!(event.created_at.is_none());
    }

    #[test]
    fn other_event_types_are_recognized() {
        let raw = r#"{"type": "email.bounced", "data": {"email_id": "em_3"}}"#;
        let event: InboundEmailEvent = serde_json::from_str(raw).unwrap();
        assert!(!event.is_email_received());
    }
}
