//! Status endpoints.

use serde::Serialize;
use serde_json::json;

use polyfed_common::entities::{Account, Context, Status, Translation};

use crate::Client;
use crate::errors::Result;
use crate::paginate::Page;
use crate::transport::Query;

/// Poll creation block inside [`CreateStatusParams`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct PollParams {
    pub options: Vec<String>,
    pub expires_in: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_totals: Option<bool>,
}

/// Parameters for `POST /api/v1/statuses`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateStatusParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll: Option<PollParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to_id: Option<String>,
    /// Quote target; gated on the `quote_posts` capability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spoiler_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<String>,
}

impl Client {
    /// Publish a status.
    pub async fn create_status(&self, params: &CreateStatusParams) -> Result<Status> {
        if params.quote_id.is_some() {
            self.require(self.features().quote_posts, "quote posts")?;
        }
        if params.poll.is_some() {
            self.require(self.features().polls, "polls")?;
        }
        if params.scheduled_at.is_some() {
            self.require(self.features().scheduled_statuses, "scheduled statuses")?;
        }
        let body = serde_json::to_value(params).unwrap_or_default();
        self.post_entity("/api/v1/statuses", body, "status").await
    }

    /// Fetch a status by id.
    pub async fn status(&self, id: &str) -> Result<Status> {
        self.get_entity(&format!("/api/v1/statuses/{id}"), "status").await
    }

    /// Delete a status; the response echoes the deleted status with its
    /// source `text` so clients can restore a draft.
    pub async fn delete_status(&self, id: &str) -> Result<Status> {
        self.delete_entity(&format!("/api/v1/statuses/{id}"), "status").await
    }

    /// Edit a status in place.
    pub async fn edit_status(&self, id: &str, params: &CreateStatusParams) -> Result<Status> {
        self.require(self.features().edit_statuses, "editing statuses")?;
        let body = serde_json::to_value(params).unwrap_or_default();
        let value = self
            .request_json(
                crate::transport::ApiRequest::new(
                    reqwest::Method::PUT,
                    &format!("/api/v1/statuses/{id}"),
                )
                .json(body),
            )
            .await?;
        self.entity_from(value, "status")
    }

    /// Thread context (ancestors and descendants) of a status.
    pub async fn status_context(&self, id: &str) -> Result<Context> {
        self.get_entity(&format!("/api/v1/statuses/{id}/context"), "context")
            .await
    }

    /// Accounts that reblogged a status.
    pub async fn reblogged_by(&self, id: &str) -> Result<Page<Account>> {
        self.get_paged(&format!("/api/v1/statuses/{id}/reblogged_by"), Query::new())
            .await
    }

    /// Accounts that favourited a status.
    pub async fn favourited_by(&self, id: &str) -> Result<Page<Account>> {
        self.get_paged(&format!("/api/v1/statuses/{id}/favourited_by"), Query::new())
            .await
    }

    /// Favourite a status.
    pub async fn favourite(&self, id: &str) -> Result<Status> {
        self.post_entity(&format!("/api/v1/statuses/{id}/favourite"), json!({}), "status")
            .await
    }

    /// Undo a favourite.
    pub async fn unfavourite(&self, id: &str) -> Result<Status> {
        self.post_entity(&format!("/api/v1/statuses/{id}/unfavourite"), json!({}), "status")
            .await
    }

    /// Reblog a status, optionally with an explicit visibility.
    pub async fn reblog(&self, id: &str, visibility: Option<&str>) -> Result<Status> {
        let mut body = json!({});
        if let Some(visibility) = visibility {
            body["visibility"] = json!(visibility);
        }
        self.post_entity(&format!("/api/v1/statuses/{id}/reblog"), body, "status")
            .await
    }

    /// Undo a reblog.
    pub async fn unreblog(&self, id: &str) -> Result<Status> {
        self.post_entity(&format!("/api/v1/statuses/{id}/unreblog"), json!({}), "status")
            .await
    }

    /// Bookmark a status.
    pub async fn bookmark(&self, id: &str) -> Result<Status> {
        self.require(self.features().bookmarks, "bookmarks")?;
        self.post_entity(&format!("/api/v1/statuses/{id}/bookmark"), json!({}), "status")
            .await
    }

    /// Remove a bookmark.
    pub async fn unbookmark(&self, id: &str) -> Result<Status> {
        self.require(self.features().bookmarks, "bookmarks")?;
        self.post_entity(&format!("/api/v1/statuses/{id}/unbookmark"), json!({}), "status")
            .await
    }

    /// Pin a status to the profile.
    pub async fn pin_status(&self, id: &str) -> Result<Status> {
        self.post_entity(&format!("/api/v1/statuses/{id}/pin"), json!({}), "status")
            .await
    }

    /// Unpin a status from the profile.
    pub async fn unpin_status(&self, id: &str) -> Result<Status> {
        self.post_entity(&format!("/api/v1/statuses/{id}/unpin"), json!({}), "status")
            .await
    }

    /// React to a status with an emoji (vendor extension).
    pub async fn react(&self, id: &str, emoji: &str) -> Result<Status> {
        self.require(self.features().emoji_reacts, "emoji reactions")?;
        self.post_entity(
            &format!("/api/v1/pleroma/statuses/{id}/reactions/{emoji}"),
            json!({}),
            "status",
        )
        .await
    }

    /// Remove an emoji reaction.
    pub async fn unreact(&self, id: &str, emoji: &str) -> Result<Status> {
        self.require(self.features().emoji_reacts, "emoji reactions")?;
        self.delete_entity(
            &format!("/api/v1/pleroma/statuses/{id}/reactions/{emoji}"),
            "status",
        )
        .await
    }

    /// Translate a status into the user's language.
    pub async fn translate_status(&self, id: &str, lang: Option<&str>) -> Result<Translation> {
        self.require(self.features().translations, "translation")?;
        let mut body = json!({});
        if let Some(lang) = lang {
            body["lang"] = json!(lang);
        }
        self.post_entity(&format!("/api/v1/statuses/{id}/translate"), body, "translation")
            .await
    }

    /// Bookmarked statuses of the authenticated user.
    pub async fn bookmarks(&self) -> Result<Page<Status>> {
        self.require(self.features().bookmarks, "bookmarks")?;
        self.get_paged("/api/v1/bookmarks", Query::new()).await
    }

    /// Favourited statuses of the authenticated user.
    pub async fn favourites(&self) -> Result<Page<Status>> {
        self.get_paged("/api/v1/favourites", Query::new()).await
    }
}
