//! Notification endpoints.

use serde_json::json;

use polyfed_common::entities::Notification;

use crate::Client;
use crate::errors::Result;
use crate::paginate::Page;
use crate::transport::Query;

/// Filters for the notification list.
#[derive(Debug, Clone, Default)]
pub struct NotificationParams {
    pub max_id: Option<String>,
    pub since_id: Option<String>,
    pub min_id: Option<String>,
    pub limit: Option<u32>,
    /// Restrict to these notification types. Array-valued; requires the
    /// `notifications_include_types` capability.
    pub types: Vec<String>,
    /// Exclude these notification types.
    pub exclude_types: Vec<String>,
}

impl Client {
    /// Notifications for the authenticated user, newest first.
    pub async fn notifications(&self, params: &NotificationParams) -> Result<Page<Notification>> {
        let mut query = Query::new()
            .push_opt("max_id", params.max_id.as_deref())
            .push_opt("since_id", params.since_id.as_deref())
            .push_opt("min_id", params.min_id.as_deref())
            .push_opt("limit", params.limit);
        if !params.types.is_empty() {
            self.require(
                self.features().notifications_include_types,
                "filtering notifications by type",
            )?;
            query = query.push_array("types", params.types.iter());
        }
        if !params.exclude_types.is_empty() {
            query = query.push_array("exclude_types", params.exclude_types.iter());
        }
        self.get_paged("/api/v1/notifications", query).await
    }

    /// Fetch a single notification.
    pub async fn notification(&self, id: &str) -> Result<Notification> {
        self.get_entity(&format!("/api/v1/notifications/{id}"), "notification")
            .await
    }

    /// Dismiss one notification.
    pub async fn dismiss_notification(&self, id: &str) -> Result<()> {
        self.require(self.features().notification_dismiss, "dismissing notifications")?;
        self.request_json(
            crate::transport::ApiRequest::new(
                reqwest::Method::POST,
                &format!("/api/v1/notifications/{id}/dismiss"),
            )
            .json(json!({})),
        )
        .await?;
        Ok(())
    }

    /// Clear all notifications.
    pub async fn clear_notifications(&self) -> Result<()> {
        self.request_json(
            crate::transport::ApiRequest::new(reqwest::Method::POST, "/api/v1/notifications/clear")
                .json(json!({})),
        )
        .await?;
        Ok(())
    }
}
