//! Structured logging for the recibo service.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{PipelineEvent, PipelineEventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
