//! Trends endpoints.

use polyfed_common::entities::{PreviewCard, Status, StatusTag};

use crate::Client;
use crate::errors::Result;
use crate::transport::Query;

impl Client {
    /// Trending hashtags.
    pub async fn trending_tags(&self, limit: Option<u32>) -> Result<Vec<StatusTag>> {
        self.require(self.features().trends, "trends")?;
        self.get_entities(
            "/api/v1/trends/tags",
            Query::new().push_opt("limit", limit),
        )
        .await
    }

    /// Trending statuses.
    pub async fn trending_statuses(&self, limit: Option<u32>) -> Result<Vec<Status>> {
        self.require(self.features().trending_statuses, "trending statuses")?;
        self.get_entities(
            "/api/v1/trends/statuses",
            Query::new().push_opt("limit", limit),
        )
        .await
    }

    /// Trending links.
    pub async fn trending_links(&self, limit: Option<u32>) -> Result<Vec<PreviewCard>> {
        self.require(self.features().trending_links, "trending links")?;
        self.get_entities(
            "/api/v1/trends/links",
            Query::new().push_opt("limit", limit),
        )
        .await
    }
}
