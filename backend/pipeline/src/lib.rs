//! `recibo-pipeline` — orchestration of one inbound receipt event.
//!
//! resolve attachments → select the image → download → re-host → OCR →
//! extract fields → assemble the record → append to the ledger.
//!
//! A run that finds no image terminates normally with `Ok(None)`; spam and
//! text-only mail are everyday inputs, not failures. Everything downstream
//! of a found image either completes or surfaces one domain error to the
//! caller (the webhook handler, which has already acked).

use std::sync::Arc;

use tracing::{info, warn};

use logging::{PipelineEvent, PipelineEventLogger};
use media::{ImageFetcher, ImageHost};
use recibo_core::{InboundEmailEvent, ReceiptRecord, ReciboError};
use recibo_extract::{extract_fields, is_valid_receipt, ValidationTargets};
use recibo_inbox::{select_image, AttachmentResolver};
use recibo_ledger::LedgerWriter;
use recibo_ocr::TextRecognizer;

/// Fallback filename for attachments the provider left unnamed.
const DEFAULT_FILENAME: &str = "recibo.jpg";

pub struct ReceiptPipeline {
    resolver: AttachmentResolver,
    fetcher: Arc<dyn ImageFetcher>,
    image_host: Arc<dyn ImageHost>,
    ocr: Arc<dyn TextRecognizer>,
    ledger: Arc<dyn LedgerWriter>,
    targets: ValidationTargets,
}

impl ReceiptPipeline {
    pub fn new(
        resolver: AttachmentResolver,
        fetcher: Arc<dyn ImageFetcher>,
        image_host: Arc<dyn ImageHost>,
        ocr: Arc<dyn TextRecognizer>,
        ledger: Arc<dyn LedgerWriter>,
        targets: ValidationTargets,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            image_host,
            ocr,
            ledger,
            targets,
        }
    }

    /// Run the pipeline for one verified `email.received` event.
    ///
    /// `Ok(None)`: no image attachment; nothing written.
    /// `Ok(Some(record))`: record appended (valid or not).
    pub async fn process(
        &self,
        event: &InboundEmailEvent,
    ) -> Result<Option<ReceiptRecord>, ReciboError> {
        let email_id = &event.data.email_id;
        PipelineEventLogger::log_event(
            email_id,
            PipelineEvent::EmailReceived {
                attachment_stubs: event.data.attachments.len(),
            },
        );

        let Some(attachments) = self.resolver.resolve(email_id, &event.data.attachments).await
        else {
            PipelineEventLogger::log_event(email_id, PipelineEvent::NoAttachment);
            return Ok(None);
        };

        let Some(image) = select_image(&attachments) else {
            info!(email_id, "Attachments present but none is an image; dropping event");
            PipelineEventLogger::log_event(email_id, PipelineEvent::NoAttachment);
            return Ok(None);
        };

        let Some(download_url) = image.download_url.as_deref().filter(|u| !u.is_empty())
        else {
            warn!(email_id, "Selected attachment has no download URL; dropping event");
            PipelineEventLogger::log_event(email_id, PipelineEvent::NoAttachment);
            return Ok(None);
        };

        PipelineEventLogger::log_event(
            email_id,
            PipelineEvent::AttachmentResolved {
                filename: image.filename.clone(),
            },
        );

        let filename = image.filename.as_deref().unwrap_or(DEFAULT_FILENAME);

        let bytes = self
            .fetcher
            .fetch(download_url)
            .await
            .map_err(|e| ReciboError::Inbox(format!("image download failed: {e}")))?;

        let link = self
            .image_host
            .upload(filename, bytes)
            .await
            .map_err(|e| ReciboError::ImageHost(e.to_string()))?;

        let text = self
            .ocr
            .recognize(&link)
            .await
            .map_err(|source| ReciboError::Ocr {
                image_link: link.clone(),
                source,
            })?;

        let fields = extract_fields(&text);
        let valid = is_valid_receipt(&text, &fields, &self.targets);
        let record = ReceiptRecord::new(
            event.data.sender(),
            &link,
            fields.amount,
            fields.operation_code,
            fields.date_time,
            valid,
        );

        self.ledger
            .append(&record)
            .await
            .map_err(|e| ReciboError::Ledger(e.to_string()))?;

        PipelineEventLogger::log_event(
            email_id,
            PipelineEvent::ReceiptRecorded {
                record_id: record.id,
                valid_receipt: record.valid_receipt,
            },
        );
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    use recibo_core::AttachmentDescriptor;
    use recibo_inbox::InboxApi;

    const OCR_TEXT: &str = "Yape! S/ 45.00 operacion 12345678 el 15 Jun. 2024 \
                            10:30 a.m. para Juan Perez telefono 987654321";

    struct FixedListing(Vec<AttachmentDescriptor>);

    #[async_trait]
    impl InboxApi for FixedListing {
        async fn list_attachments(
            &self,
            _email_id: &str,
        ) -> Result<Option<Vec<AttachmentDescriptor>>> {
            Ok(Some(self.0.clone()))
        }

        async fn get_attachment(
            &self,
            _email_id: &str,
            _attachment_id: &str,
        ) -> Result<recibo_inbox::AttachmentFetch> {
            Ok(recibo_inbox::AttachmentFetch::Pending)
        }
    }

    struct StubFetcher;

    #[async_trait]
    impl ImageFetcher for StubFetcher {
        async fn fetch(&self, _url: &str) -> Result<Bytes> {
            Ok(Bytes::from_static(b"png-bytes"))
        }
    }

    struct StubHost;

    #[async_trait]
    impl ImageHost for StubHost {
        async fn upload(&self, _filename: &str, _data: Bytes) -> Result<String> {
            Ok("https://img.example.com/hosted.png".to_string())
        }
    }

    struct FixedOcr(&'static str);

    #[async_trait]
    impl TextRecognizer for FixedOcr {
        async fn recognize(&self, _image_url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingOcr;

    #[async_trait]
    impl TextRecognizer for FailingOcr {
        async fn recognize(&self, _image_url: &str) -> Result<String> {
            Err(anyhow!("ocr service down"))
        }
    }

    #[derive(Default)]
    struct RecordingLedger {
        records: Mutex<Vec<ReceiptRecord>>,
    }

    #[async_trait]
    impl LedgerWriter for RecordingLedger {
        async fn append(&self, record: &ReceiptRecord) -> Result<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn png_attachment() -> AttachmentDescriptor {
        AttachmentDescriptor {
            id: Some("att_1".into()),
            filename: Some("recibo.png".into()),
            content_type: Some("image/png".into()),
            download_url: Some("https://files.example.com/att_1".into()),
        }
    }

    fn event(email_id: &str) -> InboundEmailEvent {
        serde_json::from_value(serde_json::json!({
            "type": "email.received",
            "data": { "email_id": email_id, "from": "payer@example.com" }
        }))
        .unwrap()
    }

    fn targets() -> ValidationTargets {
        ValidationTargets {
            name_pattern: "Juan Perez".into(),
            phone: "987654321".into(),
        }
    }

    fn pipeline(
        listing: Vec<AttachmentDescriptor>,
        ocr: Arc<dyn TextRecognizer>,
        ledger: Arc<RecordingLedger>,
        targets: ValidationTargets,
    ) -> ReceiptPipeline {
        ReceiptPipeline::new(
            AttachmentResolver::new(Arc::new(FixedListing(listing))),
            Arc::new(StubFetcher),
            Arc::new(StubHost),
            ocr,
            ledger,
            targets,
        )
    }

    #[tokio::test]
    async fn valid_receipt_is_extracted_and_recorded() {
        let ledger = Arc::new(RecordingLedger::default());
        let pipeline = pipeline(
            vec![png_attachment()],
            Arc::new(FixedOcr(OCR_TEXT)),
            ledger.clone(),
            targets(),
        );

        let record = pipeline.process(&event("em_1")).await.unwrap().unwrap();
        assert_eq!(record.amount.as_deref(), Some("45.00"));
        assert_eq!(record.operation_code.as_deref(), Some("12345678"));
        assert_eq!(record.date.as_deref(), Some("15 Jun. 2024 10:30 a.m."));
        assert!(record.valid_receipt);
        assert_eq!(record.email, "payer@example.com");
        assert_eq!(record.image_link, "https://img.example.com/hosted.png");
        assert_eq!(ledger.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn phone_mismatch_records_invalid_receipt() {
        let ledger = Arc::new(RecordingLedger::default());
        let mut wrong_phone = targets();
        wrong_phone.phone = "000000000".into();
        let pipeline = pipeline(
            vec![png_attachment()],
            Arc::new(FixedOcr(OCR_TEXT)),
            ledger.clone(),
            wrong_phone,
        );

        let record = pipeline.process(&event("em_1")).await.unwrap().unwrap();
        assert!(!record.valid_receipt);
        assert!(record.operation_code.is_none());
        // Invalid receipts still land in the ledger.
        assert_eq!(ledger.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn no_attachments_means_no_ledger_write() {
        let ledger = Arc::new(RecordingLedger::default());
        let pipeline = pipeline(
            vec![],
            Arc::new(FixedOcr(OCR_TEXT)),
            ledger.clone(),
            targets(),
        );

        let outcome = pipeline.process(&event("em_1")).await.unwrap();
        assert!(outcome.is_none());
        assert!(ledger.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_image_attachments_are_dropped() {
        let ledger = Arc::new(RecordingLedger::default());
        let pdf = AttachmentDescriptor {
            id: Some("att_1".into()),
            filename: Some("factura.pdf".into()),
            content_type: Some("application/pdf".into()),
            download_url: Some("https://files.example.com/att_1".into()),
        };
        let pipeline = pipeline(vec![pdf], Arc::new(FixedOcr(OCR_TEXT)), ledger.clone(), targets());

        assert!(pipeline.process(&event("em_1")).await.unwrap().is_none());
        assert!(ledger.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ocr_failure_is_wrapped_and_no_record_written() {
        let ledger = Arc::new(RecordingLedger::default());
        let pipeline = pipeline(
            vec![png_attachment()],
            Arc::new(FailingOcr),
            ledger.clone(),
            targets(),
        );

        let err = pipeline.process(&event("em_1")).await.unwrap_err();
        assert!(matches!(err, ReciboError::Ocr { .. }));
        assert!(ledger.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreadable_image_yields_invalid_but_recorded_receipt() {
        let ledger = Arc::new(RecordingLedger::default());
        let pipeline = pipeline(
            vec![png_attachment()],
            Arc::new(FixedOcr("")),
            ledger.clone(),
            targets(),
        );

        let record = pipeline.process(&event("em_1")).await.unwrap().unwrap();
        assert!(!record.valid_receipt);
        assert!(record.amount.is_none());
        assert_eq!(ledger.records.lock().unwrap().len(), 1);
    }
}
