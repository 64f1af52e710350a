//! `recibo-ledger` — append-only receipt ledger.
//!
//! One row per processed receipt, appended to a spreadsheet-backed store.
//! Rows are never updated or deleted; invalid receipts are appended too,
//! as an audit trail, just without a trusted operation code.

pub mod sheets;

pub use sheets::SheetsLedger;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use recibo_core::ReceiptRecord;
use recibo_extract::NOT_FOUND;

/// Append-only persistence for receipt records.
#[async_trait]
pub trait LedgerWriter: Send + Sync {
    async fn append(&self, record: &ReceiptRecord) -> Result<()>;
}

/// Render a record as the ledger row:
/// id, email, amount, imageLink, validReceipt, operationCode, date.
/// Fields the extractors could not find are persisted as `NOT_FOUND`;
/// the operation code of an invalid receipt is left blank.
pub fn to_row(record: &ReceiptRecord) -> Vec<Value> {
    vec![
        json!(record.id.to_string()),
        json!(record.email),
        json!(record.amount.as_deref().unwrap_or(NOT_FOUND)),
        json!(record.image_link),
        json!(record.valid_receipt),
        json!(record.operation_code.as_deref().unwrap_or("")),
        json!(record.date.as_deref().unwrap_or(NOT_FOUND)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_renders_missing_fields_as_not_found() {
        let record = ReceiptRecord::new("a@x.com", "https://img/1.png", None, None, None, false);
        let row = to_row(&record);
        assert_eq!(row.len(), 7);
        assert_eq!(row[2], "NOT_FOUND");
        assert_eq!(row[4], false);
        assert_eq!(row[5], "");
        assert_eq!(row[6], "NOT_FOUND");
    }

    #[test]
    fn row_keeps_operation_code_of_valid_receipt() {
        let record = ReceiptRecord::new(
            "a@x.com",
            "https://img/1.png",
            Some("45.00".into()),
            Some("12345678".into()),
            Some("15 Jun. 2024".into()),
            true,
        );
        let row = to_row(&record);
        assert_eq!(row[2], "45.00");
        assert_eq!(row[4], true);
        assert_eq!(row[5], "12345678");
    }
}
