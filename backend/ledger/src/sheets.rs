//! Spreadsheet-backed ledger writer.
//!
//! Thin wrapper over the values-append endpoint:
//!   POST {endpoint}/{sheet_id}/values/{range}:append?valueInputOption=RAW

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use recibo_core::ReceiptRecord;

use crate::{to_row, LedgerWriter};

/// Sheet range rows are appended under.
const APPEND_RANGE: &str = "A1";

pub struct SheetsLedger {
    client: reqwest::Client,
    endpoint: String,
    sheet_id: String,
    token: String,
}

impl SheetsLedger {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        sheet_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            sheet_id: sheet_id.into(),
            token: token.into(),
        }
    }

    fn append_url(&self) -> String {
        format!(
            "{}/{}/values/{APPEND_RANGE}:append?valueInputOption=RAW",
            self.endpoint.trim_end_matches('/'),
            self.sheet_id
        )
    }
}

#[async_trait]
impl LedgerWriter for SheetsLedger {
    async fn append(&self, record: &ReceiptRecord) -> Result<()> {
        let body = json!({ "values": [to_row(record)] });

        let response = self
            .client
            .post(self.append_url())
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Ledger append answered {}",
                response.status()
            ));
        }

        info!(record_id = %record.id, valid = record.valid_receipt, "Receipt appended to ledger");
        Ok(())
    }
}
