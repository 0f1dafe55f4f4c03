//! Canonical post entity.

use serde::Deserialize;
use serde_json::Value;

use super::{
    Account, Application, CustomEmoji, EmojiReaction, Entity, FilterResult, MediaAttachment,
    Mention, Poll, PreviewCard, StatusTag, lift_vendor_fields, preprocess_child,
    preprocess_children, rename_key,
};
use crate::lenient::{filtered, lenient, lenient_id};

/// Status visibility. Unknown wire values degrade to `Public`.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Unlisted,
    Private,
    Direct,
    /// Vendor extension: visible to the local instance only.
    Local,
}

/// Canonical post. Self-referential through `reblog` and `quote`; the wire
/// format is a DAG, so the nested payloads are owned immutable
/// substructures with no back-references.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Status {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub uri: String,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    pub account: Box<Account>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub in_reply_to_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub in_reply_to_account_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub reblog: Option<Box<Status>>,
    #[serde(default, deserialize_with = "lenient")]
    pub quote: Option<Box<Status>>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub quote_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub edited_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub sensitive: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub spoiler_text: String,
    #[serde(default, deserialize_with = "lenient")]
    pub visibility: Visibility,
    #[serde(default, deserialize_with = "lenient")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "filtered")]
    pub media_attachments: Vec<MediaAttachment>,
    #[serde(default, deserialize_with = "filtered")]
    pub mentions: Vec<Mention>,
    #[serde(default, deserialize_with = "filtered")]
    pub tags: Vec<StatusTag>,
    #[serde(default, deserialize_with = "filtered")]
    pub emojis: Vec<CustomEmoji>,
    #[serde(default, deserialize_with = "lenient")]
    pub reblogs_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub favourites_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub replies_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub quotes_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub favourited: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub reblogged: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub muted: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub bookmarked: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub pinned: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub poll: Option<Poll>,
    #[serde(default, deserialize_with = "lenient")]
    pub card: Option<PreviewCard>,
    #[serde(default, deserialize_with = "lenient")]
    pub application: Option<Application>,
    #[serde(default, deserialize_with = "filtered")]
    pub filtered: Vec<FilterResult>,
    /// Vendor extension: conversation/thread id.
    #[serde(default, deserialize_with = "lenient_id")]
    pub conversation_id: Option<String>,
    /// Vendor extension: the status originates on this instance.
    #[serde(default, deserialize_with = "lenient")]
    pub local: Option<bool>,
    /// Vendor extension: emoji reaction tallies.
    #[serde(default, deserialize_with = "filtered")]
    pub emoji_reactions: Vec<EmojiReaction>,
}

impl Entity for Status {
    fn preprocess(value: &mut Value) {
        lift_vendor_fields(
            value,
            "pleroma",
            &[
                "conversation_id",
                "local",
                "emoji_reactions",
                "quotes_count",
                "quote",
                "quote_id",
            ],
        );
        // Some dialects nest the quoted status under a different key.
        rename_key(value, "quoted_status", "quote");

        preprocess_child::<Account>(value, "account");
        preprocess_child::<Status>(value, "reblog");
        preprocess_child::<Status>(value, "quote");
        preprocess_child::<Poll>(value, "poll");
        preprocess_children::<MediaAttachment>(value, "media_attachments");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account(id: &str) -> Value {
        json!({ "id": id, "username": "alice", "acct": "alice", "url": "https://example.social/@alice" })
    }

    fn minimal(id: &str) -> Value {
        json!({
            "id": id,
            "account": account("a1"),
            "content": "<p>hello</p>",
            "visibility": "public"
        })
    }

    #[test]
    fn nested_reblog_with_quote_preserves_depth() {
        let mut payload = minimal("1");
        payload["reblog"] = minimal("2");
        payload["reblog"]["quote"] = minimal("3");

        let status = Status::from_value(payload).unwrap();
        let reblog = status.reblog.as_ref().unwrap();
        assert_eq!(reblog.id, "2");
        let quote = reblog.quote.as_ref().unwrap();
        assert_eq!(quote.id, "3");
        assert!(quote.reblog.is_none() && quote.quote.is_none());
    }

    #[test]
    fn deep_reblog_chain_does_not_overflow() {
        let mut payload = minimal("0");
        let mut cursor = &mut payload;
        for depth in 1..=64 {
            cursor["reblog"] = minimal(&depth.to_string());
            cursor = &mut cursor["reblog"];
        }
        let mut status = Status::from_value(payload).unwrap();
        let mut depth = 0;
        while let Some(inner) = status.reblog {
            status = *inner;
            depth += 1;
        }
        assert_eq!(depth, 64);
    }

    #[test]
    fn pleroma_quote_and_counters_are_lifted() {
        let mut payload = minimal("4");
        payload["pleroma"] = json!({
            "quote": minimal("5"),
            "quotes_count": 7,
            "conversation_id": 99,
            "local": true,
            "emoji_reactions": [ { "name": "🦀", "count": 2, "me": false } ]
        });

        let status = Status::from_value(payload).unwrap();
        assert_eq!(status.quote.unwrap().id, "5");
        assert_eq!(status.quotes_count, 7);
        assert_eq!(status.conversation_id.as_deref(), Some("99"));
        assert_eq!(status.local, Some(true));
        assert_eq!(status.emoji_reactions[0].name, "🦀");
    }

    #[test]
    fn invalid_reblog_degrades_to_none() {
        let mut payload = minimal("6");
        payload["reblog"] = json!({ "content": "missing id and account" });
        let status = Status::from_value(payload).unwrap();
        assert!(status.reblog.is_none());
    }

    #[test]
    fn unknown_visibility_degrades_to_public() {
        let mut payload = minimal("7");
        payload["visibility"] = json!("subscribers");
        let status = Status::from_value(payload).unwrap();
        assert_eq!(status.visibility, Visibility::Public);
    }

    #[test]
    fn malformed_attachment_is_dropped() {
        let mut payload = minimal("8");
        payload["media_attachments"] = json!([
            { "id": "m1", "type": "image", "url": "u1" },
            { "type": "image", "url": "no id" },
            { "id": "m2", "type": "video", "url": "u2" }
        ]);
        let status = Status::from_value(payload).unwrap();
        let ids: Vec<&str> = status.media_attachments.iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }
}
