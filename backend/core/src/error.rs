use thiserror::Error;

/// Top-level error type for the recibo service.
#[derive(Debug, Error)]
pub enum ReciboError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("inbox provider error: {0}")]
    Inbox(String),

    #[error("image host error: {0}")]
    ImageHost(String),

    #[error("OCR call failed for {image_link}")]
    Ocr {
        image_link: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("ledger append failed: {0}")]
    Ledger(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
