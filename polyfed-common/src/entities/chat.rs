//! Chat entities (vendor dialect).

use serde::Deserialize;
use serde_json::Value;

use super::{Account, CustomEmoji, Entity, MediaAttachment, PreviewCard, preprocess_child};
use crate::lenient::{filtered, lenient, lenient_id};

/// A one-to-one chat with another account.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Chat {
    pub id: String,
    pub account: Box<Account>,
    #[serde(default, deserialize_with = "lenient")]
    pub unread: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub last_message: Option<ChatMessage>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,
}

impl Entity for Chat {
    fn preprocess(value: &mut Value) {
        preprocess_child::<Account>(value, "account");
        preprocess_child::<ChatMessage>(value, "last_message");
    }
}

/// One message within a chat.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub chat_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub account_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub attachment: Option<MediaAttachment>,
    #[serde(default, deserialize_with = "lenient")]
    pub card: Option<PreviewCard>,
    #[serde(default, deserialize_with = "filtered")]
    pub emojis: Vec<CustomEmoji>,
    #[serde(default, deserialize_with = "lenient")]
    pub unread: bool,
}

impl Entity for ChatMessage {
    fn preprocess(value: &mut Value) {
        preprocess_child::<MediaAttachment>(value, "attachment");
    }
}
