//! Chat endpoints (vendor dialect).

use serde_json::json;

use polyfed_common::entities::{Chat, ChatMessage};

use crate::Client;
use crate::errors::Result;
use crate::paginate::Page;
use crate::transport::Query;

impl Client {
    /// Chats of the authenticated user, most recent first.
    pub async fn chats(&self) -> Result<Page<Chat>> {
        self.require(self.features().chats, "chats")?;
        self.get_paged("/api/v2/pleroma/chats", Query::new()).await
    }

    /// Open (or return the existing) chat with an account.
    pub async fn chat_by_account(&self, account_id: &str) -> Result<Chat> {
        self.require(self.features().chats, "chats")?;
        self.post_entity(
            &format!("/api/v1/pleroma/chats/by-account-id/{account_id}"),
            json!({}),
            "chat",
        )
        .await
    }

    /// Messages within a chat.
    pub async fn chat_messages(&self, chat_id: &str) -> Result<Page<ChatMessage>> {
        self.require(self.features().chats, "chats")?;
        self.get_paged(&format!("/api/v1/pleroma/chats/{chat_id}/messages"), Query::new())
            .await
    }

    /// Send a message, optionally referencing an uploaded attachment.
    pub async fn send_chat_message(
        &self,
        chat_id: &str,
        content: &str,
        media_id: Option<&str>,
    ) -> Result<ChatMessage> {
        self.require(self.features().chats, "chats")?;
        let mut body = json!({ "content": content });
        if let Some(media_id) = media_id {
            body["media_id"] = json!(media_id);
        }
        self.post_entity(
            &format!("/api/v1/pleroma/chats/{chat_id}/messages"),
            body,
            "chat message",
        )
        .await
    }

    /// Delete one chat message.
    pub async fn delete_chat_message(&self, chat_id: &str, message_id: &str) -> Result<ChatMessage> {
        self.require(self.features().chats, "chats")?;
        self.delete_entity(
            &format!("/api/v1/pleroma/chats/{chat_id}/messages/{message_id}"),
            "chat message",
        )
        .await
    }

    /// Mark messages read up to `last_read_id`.
    pub async fn mark_chat_read(&self, chat_id: &str, last_read_id: &str) -> Result<Chat> {
        self.require(self.features().chats, "chats")?;
        self.post_entity(
            &format!("/api/v1/pleroma/chats/{chat_id}/read"),
            json!({ "last_read_id": last_read_id }),
            "chat",
        )
        .await
    }
}
