//! Timeline endpoints.

use polyfed_common::entities::Status;

use crate::Client;
use crate::errors::Result;
use crate::paginate::Page;
use crate::transport::Query;

/// Shared range/filter parameters for timeline-shaped endpoints.
#[derive(Debug, Clone, Default)]
pub struct TimelineParams {
    pub max_id: Option<String>,
    pub since_id: Option<String>,
    pub min_id: Option<String>,
    pub limit: Option<u32>,
    pub only_media: Option<bool>,
    pub exclude_replies: Option<bool>,
    pub exclude_reblogs: Option<bool>,
    pub pinned: Option<bool>,
    pub tagged: Option<String>,
}

impl TimelineParams {
    pub(crate) fn to_query(&self) -> Query {
        Query::new()
            .push_opt("max_id", self.max_id.as_deref())
            .push_opt("since_id", self.since_id.as_deref())
            .push_opt("min_id", self.min_id.as_deref())
            .push_opt("limit", self.limit)
            .push_opt("only_media", self.only_media)
            .push_opt("exclude_replies", self.exclude_replies)
            .push_opt("exclude_reblogs", self.exclude_reblogs)
            .push_opt("pinned", self.pinned)
            .push_opt("tagged", self.tagged.as_deref())
    }
}

impl Client {
    /// Home timeline of the authenticated user.
    pub async fn home_timeline(&self, params: &TimelineParams) -> Result<Page<Status>> {
        self.get_paged("/api/v1/timelines/home", params.to_query()).await
    }

    /// Public timeline; `local` restricts to statuses originating on this
    /// instance.
    pub async fn public_timeline(
        &self,
        local: bool,
        params: &TimelineParams,
    ) -> Result<Page<Status>> {
        let mut query = params.to_query();
        if local {
            query = query.push("local", true);
        }
        self.get_paged("/api/v1/timelines/public", query).await
    }

    /// Statuses carrying a hashtag.
    pub async fn hashtag_timeline(
        &self,
        hashtag: &str,
        params: &TimelineParams,
    ) -> Result<Page<Status>> {
        self.get_paged(&format!("/api/v1/timelines/tag/{hashtag}"), params.to_query())
            .await
    }

    /// Timeline of a user list.
    pub async fn list_timeline(
        &self,
        list_id: &str,
        params: &TimelineParams,
    ) -> Result<Page<Status>> {
        self.require(self.features().lists, "lists")?;
        self.get_paged(&format!("/api/v1/timelines/list/{list_id}"), params.to_query())
            .await
    }

    /// Whole-known-network timeline (vendor dialects only).
    pub async fn global_timeline(&self, params: &TimelineParams) -> Result<Page<Status>> {
        self.require(self.features().global_timeline, "the global timeline")?;
        let query = params.to_query().push("remote", true);
        self.get_paged("/api/v1/timelines/public", query).await
    }
}
