//! Announcement endpoints.

use serde_json::json;

use polyfed_common::entities::Announcement;

use crate::Client;
use crate::errors::Result;
use crate::transport::{ApiRequest, Query};

impl Client {
    /// Active server announcements.
    pub async fn announcements(&self) -> Result<Vec<Announcement>> {
        self.require(self.features().announcements, "announcements")?;
        self.get_entities("/api/v1/announcements", Query::new()).await
    }

    /// Mark an announcement read.
    pub async fn dismiss_announcement(&self, id: &str) -> Result<()> {
        self.require(self.features().announcements, "announcements")?;
        self.request_json(
            ApiRequest::new(
                reqwest::Method::POST,
                &format!("/api/v1/announcements/{id}/dismiss"),
            )
            .json(json!({})),
        )
        .await?;
        Ok(())
    }

    /// React to an announcement with an emoji.
    pub async fn add_announcement_reaction(&self, id: &str, name: &str) -> Result<()> {
        self.require(self.features().announcement_reactions, "announcement reactions")?;
        self.request_json(
            ApiRequest::new(
                reqwest::Method::PUT,
                &format!("/api/v1/announcements/{id}/reactions/{name}"),
            )
            .json(json!({})),
        )
        .await?;
        Ok(())
    }

    /// Remove an emoji reaction from an announcement.
    pub async fn remove_announcement_reaction(&self, id: &str, name: &str) -> Result<()> {
        self.require(self.features().announcement_reactions, "announcement reactions")?;
        self.request_json(ApiRequest::new(
            reqwest::Method::DELETE,
            &format!("/api/v1/announcements/{id}/reactions/{name}"),
        ))
        .await?;
        Ok(())
    }
}
