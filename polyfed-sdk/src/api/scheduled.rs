//! Scheduled statuses.

use serde_json::json;

use polyfed_common::entities::ScheduledStatus;

use crate::Client;
use crate::errors::Result;
use crate::paginate::Page;
use crate::transport::{ApiRequest, Query};

impl Client {
    /// Statuses queued for future publishing.
    pub async fn scheduled_statuses(&self) -> Result<Page<ScheduledStatus>> {
        self.require(self.features().scheduled_statuses, "scheduled statuses")?;
        self.get_paged("/api/v1/scheduled_statuses", Query::new()).await
    }

    /// Fetch one scheduled status.
    pub async fn scheduled_status(&self, id: &str) -> Result<ScheduledStatus> {
        self.require(self.features().scheduled_statuses, "scheduled statuses")?;
        self.get_entity(&format!("/api/v1/scheduled_statuses/{id}"), "scheduled status")
            .await
    }

    /// Move a scheduled status to a new publish time.
    pub async fn reschedule_status(&self, id: &str, scheduled_at: &str) -> Result<ScheduledStatus> {
        self.require(self.features().scheduled_statuses, "scheduled statuses")?;
        let value = self
            .request_json(
                ApiRequest::new(reqwest::Method::PUT, &format!("/api/v1/scheduled_statuses/{id}"))
                    .json(json!({ "scheduled_at": scheduled_at })),
            )
            .await?;
        self.entity_from(value, "scheduled status")
    }

    /// Cancel a scheduled status.
    pub async fn cancel_scheduled_status(&self, id: &str) -> Result<()> {
        self.require(self.features().scheduled_statuses, "scheduled statuses")?;
        self.request_json(ApiRequest::new(
            reqwest::Method::DELETE,
            &format!("/api/v1/scheduled_statuses/{id}"),
        ))
        .await?;
        Ok(())
    }
}
