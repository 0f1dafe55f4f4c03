//! Conversation endpoints.

use serde_json::json;

use polyfed_common::entities::Conversation;

use crate::Client;
use crate::errors::Result;
use crate::paginate::Page;
use crate::transport::{ApiRequest, Query};

impl Client {
    /// Direct-message conversations.
    pub async fn conversations(&self, limit: Option<u32>) -> Result<Page<Conversation>> {
        self.require(self.features().conversations, "conversations")?;
        self.get_paged("/api/v1/conversations", Query::new().push_opt("limit", limit))
            .await
    }

    /// Mark a conversation read.
    pub async fn mark_conversation_read(&self, id: &str) -> Result<Conversation> {
        self.require(self.features().conversations, "conversations")?;
        self.post_entity(&format!("/api/v1/conversations/{id}/read"), json!({}), "conversation")
            .await
    }

    /// Remove a conversation from the list.
    pub async fn delete_conversation(&self, id: &str) -> Result<()> {
        self.require(self.features().conversations, "conversations")?;
        self.request_json(ApiRequest::new(
            reqwest::Method::DELETE,
            &format!("/api/v1/conversations/{id}"),
        ))
        .await?;
        Ok(())
    }
}
