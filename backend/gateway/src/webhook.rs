//! Inbound webhook endpoint.
//!
//! Verifies the delivery signature, acks, and hands the event to the
//! pipeline on a spawned task: the provider's timeout budget is short
//! and a slow OCR call must never trigger a redelivery.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use tracing::{debug, error, warn};

use logging::{PipelineEvent, PipelineEventLogger};
use recibo_core::InboundEmailEvent;

use crate::server::GatewayState;
use crate::signature::verify_signature;

/// The three required delivery headers.
pub const ID_HEADER: &str = "webhook-id";
pub const TIMESTAMP_HEADER: &str = "webhook-timestamp";
pub const SIGNATURE_HEADER: &str = "webhook-signature";

/// POST /webhooks/email — receive one signed delivery.
///
/// Responses: 400 missing headers, 401 bad signature, otherwise 200,
/// always, even when the pipeline later fails. Anything downstream of the
/// ack is observable only in the logs.
pub async fn receive_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let (Some(msg_id), Some(timestamp), Some(signature)) = (
        header(ID_HEADER),
        header(TIMESTAMP_HEADER),
        header(SIGNATURE_HEADER),
    ) else {
        warn!("Webhook delivery missing signature headers");
        return StatusCode::BAD_REQUEST;
    };

    if !verify_signature(&state.webhook_secret, msg_id, timestamp, &body, signature) {
        warn!(msg_id, "Webhook signature verification failed");
        return StatusCode::UNAUTHORIZED;
    }

    let event: InboundEmailEvent = match serde_json::from_str(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(msg_id, error = %e, "Verified delivery carried an unparseable payload");
            return StatusCode::OK;
        }
    };

    if !event.is_email_received() {
        debug!(msg_id, event_type = %event.event_type, "Ignoring non-email event");
        return StatusCode::OK;
    }

    // Ack first, work later: the pipeline runs on its own task.
    let pipeline = state.pipeline.clone();
    tokio::spawn(async move {
        let email_id = event.data.email_id.clone();
        if let Err(e) = pipeline.process(&event).await {
            error!(email_id, error = %e, "Receipt pipeline failed");
            PipelineEventLogger::log_event(
                &email_id,
                PipelineEvent::PipelineFailed {
                    error_msg: e.to_string(),
                },
            );
        }
    });

    StatusCode::OK
}
