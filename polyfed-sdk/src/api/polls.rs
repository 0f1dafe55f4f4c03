//! Poll endpoints.

use serde_json::json;

use polyfed_common::entities::Poll;

use crate::Client;
use crate::errors::Result;

impl Client {
    /// Fetch a poll by id.
    pub async fn poll(&self, id: &str) -> Result<Poll> {
        self.require(self.features().polls, "polls")?;
        self.get_entity(&format!("/api/v1/polls/{id}"), "poll").await
    }

    /// Vote on a poll. `choices` are zero-based option indices.
    pub async fn vote(&self, id: &str, choices: &[u64]) -> Result<Poll> {
        self.require(self.features().polls, "polls")?;
        self.post_entity(
            &format!("/api/v1/polls/{id}/votes"),
            json!({ "choices": choices }),
            "poll",
        )
        .await
    }
}
