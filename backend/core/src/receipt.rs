use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One processed receipt, written exactly once to the ledger and never
/// mutated afterward.
///
/// `operation_code` is populated iff `valid_receipt` is true: invalid
/// receipts are still recorded for audit, but without a trusted code.
/// The constructor owns that invariant so call sites cannot break it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub id: Uuid,
    pub email: String,
    pub amount: Option<String>,
    pub image_link: String,
    pub valid_receipt: bool,
    pub operation_code: Option<String>,
    pub date: Option<String>,
}

impl ReceiptRecord {
    pub fn new(
        email: impl Into<String>,
        image_link: impl Into<String>,
        amount: Option<String>,
        operation_code: Option<String>,
        date: Option<String>,
        valid_receipt: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            amount,
            image_link: image_link.into(),
            valid_receipt,
            operation_code: if valid_receipt { operation_code } else { None },
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_receipt_keeps_operation_code() {
        let record = ReceiptRecord::new(
            "payer@example.com",
            "https://img.example.com/1.png",
            Some("45.00".into()),
            Some("12345678".into()),
            Some("15 Jun. 2024 10:30 a.m.".into()),
            true,
        );
        assert!(record.valid_receipt);
        assert_eq!(record.operation_code.as_deref(), Some("12345678"));
        assert!(!record.id.is_nil());
    }

    #[test]
    fn invalid_receipt_drops_operation_code() {
        let record = ReceiptRecord::new(
            "payer@example.com",
            "https://img.example.com/1.png",
            Some("45.00".into()),
            Some("12345678".into()),
            None,
            false,
        );
        assert!(!record.valid_receipt);
        assert!(record.operation_code.is_none());
    }

    #[test]
    fn each_record_gets_a_fresh_id() {
        let a = ReceiptRecord::new("a@x.com", "link", None, None, None, false);
        let b = ReceiptRecord::new("a@x.com", "link", None, None, None, false);
        assert_ne!(a.id, b.id);
    }
}
