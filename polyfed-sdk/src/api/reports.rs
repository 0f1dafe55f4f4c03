//! Filing reports.

use serde_json::json;

use polyfed_common::entities::Report;

use crate::Client;
use crate::errors::Result;

impl Client {
    /// Report an account, optionally attaching offending statuses.
    pub async fn report_account(
        &self,
        account_id: &str,
        status_ids: &[&str],
        comment: Option<&str>,
        forward: bool,
    ) -> Result<Report> {
        if status_ids.len() > 1 {
            self.require(
                self.features().report_multiple_statuses,
                "reporting multiple statuses at once",
            )?;
        }
        if forward {
            self.require(self.features().report_forwarding, "forwarding reports")?;
        }
        let mut body = json!({ "account_id": account_id });
        if !status_ids.is_empty() {
            body["status_ids"] = json!(status_ids);
        }
        if let Some(comment) = comment {
            body["comment"] = json!(comment);
        }
        if forward {
            body["forward"] = json!(true);
        }
        self.post_entity("/api/v1/reports", body, "report").await
    }
}
