//! Pipeline Event Logger
//!
//! Structured events (email received, attachment resolved, receipt
//! recorded, failures) written to the rolling NDJSON logs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    EmailReceived {
        attachment_stubs: usize,
    },
    AttachmentResolved {
        filename: Option<String>,
    },
    NoAttachment,
    ReceiptRecorded {
        record_id: Uuid,
        valid_receipt: bool,
    },
    PipelineFailed {
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub email_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: PipelineEvent,
}

pub struct PipelineEventLogger;

impl PipelineEventLogger {
    /// Logs one pipeline event, scrubbing free-text content first.
    pub fn log_event(email_id: &str, mut event: PipelineEvent) {
        if let PipelineEvent::PipelineFailed { error_msg } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }

        let entry = EventLogEntry {
            email_id: email_id.into(),
            timestamp: Utc::now(),
            event,
        };

        info!(target: "pipeline_events", event = ?entry, "Pipeline event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_snake_case_tag() {
        let event = PipelineEvent::ReceiptRecorded {
            record_id: Uuid::new_v4(),
            valid_receipt: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "receipt_recorded");
        assert_eq!(json["valid_receipt"], true);
    }
}
