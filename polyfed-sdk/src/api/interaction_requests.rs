//! Interaction requests (dialects that gate replies/boosts/favourites).

use serde_json::json;

use polyfed_common::entities::InteractionRequest;

use crate::Client;
use crate::errors::Result;
use crate::paginate::Page;
use crate::transport::Query;

impl Client {
    /// Pending interaction requests.
    pub async fn interaction_requests(&self) -> Result<Page<InteractionRequest>> {
        self.require(self.features().interaction_requests, "interaction requests")?;
        self.get_paged("/api/v1/interaction_requests", Query::new()).await
    }

    /// Approve a pending interaction.
    pub async fn authorize_interaction_request(&self, id: &str) -> Result<InteractionRequest> {
        self.require(self.features().interaction_requests, "interaction requests")?;
        self.post_entity(
            &format!("/api/v1/interaction_requests/{id}/authorize"),
            json!({}),
            "interaction request",
        )
        .await
    }

    /// Reject a pending interaction.
    pub async fn reject_interaction_request(&self, id: &str) -> Result<InteractionRequest> {
        self.require(self.features().interaction_requests, "interaction requests")?;
        self.post_entity(
            &format!("/api/v1/interaction_requests/{id}/reject"),
            json!({}),
            "interaction request",
        )
        .await
    }
}
