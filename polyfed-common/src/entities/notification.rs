//! Notification entity: a closed set of variants discriminated by `type`.
//!
//! The tag selects which payload shape is valid; unrecognized tags fail the
//! single notification, which the filtered-array policy then drops from the
//! batch.

use serde::Deserialize;
use serde_json::Value;

use super::{
    Account, AccountWarning, ChatMessage, Entity, RelationshipSeveranceEvent, Report, Status,
    preprocess_child, rename_key,
};
use crate::lenient::lenient;

/// Fields shared by every notification variant.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct NotificationBase {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
}

/// A notification, discriminated by its `type` tag. Each variant carries
/// only the fields relevant to that type.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    Mention {
        #[serde(flatten)]
        base: NotificationBase,
        account: Box<Account>,
        status: Box<Status>,
    },
    /// A followed account posted (subscription notification).
    Status {
        #[serde(flatten)]
        base: NotificationBase,
        account: Box<Account>,
        status: Box<Status>,
    },
    Reblog {
        #[serde(flatten)]
        base: NotificationBase,
        account: Box<Account>,
        status: Box<Status>,
    },
    Favourite {
        #[serde(flatten)]
        base: NotificationBase,
        account: Box<Account>,
        status: Box<Status>,
    },
    Follow {
        #[serde(flatten)]
        base: NotificationBase,
        account: Box<Account>,
    },
    FollowRequest {
        #[serde(flatten)]
        base: NotificationBase,
        account: Box<Account>,
    },
    Poll {
        #[serde(flatten)]
        base: NotificationBase,
        status: Box<Status>,
    },
    Update {
        #[serde(flatten)]
        base: NotificationBase,
        status: Box<Status>,
    },
    #[serde(rename = "admin.sign_up")]
    AdminSignUp {
        #[serde(flatten)]
        base: NotificationBase,
        account: Box<Account>,
    },
    #[serde(rename = "admin.report")]
    AdminReport {
        #[serde(flatten)]
        base: NotificationBase,
        account: Box<Account>,
        report: Report,
    },
    SeveredRelationships {
        #[serde(flatten)]
        base: NotificationBase,
        #[serde(default, deserialize_with = "lenient")]
        relationship_severance_event: RelationshipSeveranceEvent,
    },
    ModerationWarning {
        #[serde(flatten)]
        base: NotificationBase,
        #[serde(default, deserialize_with = "lenient")]
        moderation_warning: AccountWarning,
    },
    Move {
        #[serde(flatten)]
        base: NotificationBase,
        account: Box<Account>,
        target: Box<Account>,
    },
    EmojiReaction {
        #[serde(flatten)]
        base: NotificationBase,
        account: Box<Account>,
        status: Box<Status>,
        #[serde(default, deserialize_with = "lenient")]
        emoji: String,
        #[serde(default, deserialize_with = "lenient")]
        emoji_url: Option<String>,
    },
    ChatMention {
        #[serde(flatten)]
        base: NotificationBase,
        account: Box<Account>,
        chat_message: ChatMessage,
    },
    ParticipationAccepted {
        #[serde(flatten)]
        base: NotificationBase,
        account: Box<Account>,
        #[serde(default, deserialize_with = "lenient")]
        status: Option<Box<Status>>,
    },
    ParticipationRejected {
        #[serde(flatten)]
        base: NotificationBase,
        account: Box<Account>,
        #[serde(default, deserialize_with = "lenient")]
        status: Option<Box<Status>>,
    },
}

impl Notification {
    /// Shared fields regardless of variant.
    pub fn base(&self) -> &NotificationBase {
        match self {
            Notification::Mention { base, .. }
            | Notification::Status { base, .. }
            | Notification::Reblog { base, .. }
            | Notification::Favourite { base, .. }
            | Notification::Follow { base, .. }
            | Notification::FollowRequest { base, .. }
            | Notification::Poll { base, .. }
            | Notification::Update { base, .. }
            | Notification::AdminSignUp { base, .. }
            | Notification::AdminReport { base, .. }
            | Notification::SeveredRelationships { base, .. }
            | Notification::ModerationWarning { base, .. }
            | Notification::Move { base, .. }
            | Notification::EmojiReaction { base, .. }
            | Notification::ChatMention { base, .. }
            | Notification::ParticipationAccepted { base, .. }
            | Notification::ParticipationRejected { base, .. } => base,
        }
    }

    /// Notification id.
    pub fn id(&self) -> &str {
        &self.base().id
    }
}

impl Entity for Notification {
    fn preprocess(value: &mut Value) {
        // Vendor-prefixed tags map onto canonical variants.
        if let Some(tag) = value.get("type").and_then(Value::as_str) {
            let canonical = match tag {
                "pleroma:emoji_reaction" => Some("emoji_reaction"),
                "pleroma:chat_mention" => Some("chat_mention"),
                "pleroma:report" => Some("admin.report"),
                "pleroma:participation_accepted" => Some("participation_accepted"),
                "pleroma:participation_rejected" => Some("participation_rejected"),
                _ => None,
            };
            if let Some(canonical) = canonical {
                if let Some(map) = value.as_object_mut() {
                    map.insert("type".into(), Value::String(canonical.into()));
                }
            }
        }
        rename_key(value, "target_account", "target");

        preprocess_child::<Account>(value, "account");
        preprocess_child::<Account>(value, "target");
        preprocess_child::<Status>(value, "status");
        preprocess_child::<Report>(value, "report");
        preprocess_child::<ChatMessage>(value, "chat_message");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lenient::parse_entities;
    use serde_json::json;

    fn account(id: &str) -> Value {
        json!({ "id": id, "username": "carol", "acct": "carol", "url": "https://example.social/@carol" })
    }

    fn status(id: &str) -> Value {
        json!({ "id": id, "account": account("a"), "content": "hi" })
    }

    #[test]
    fn follow_dispatches_to_account_variant_without_status() {
        let n = Notification::from_value(json!({
            "id": "n1",
            "type": "follow",
            "created_at": "2024-01-01T00:00:00.000Z",
            "account": account("a2")
        }))
        .unwrap();
        let Notification::Follow { account, .. } = n else {
            panic!("expected follow variant");
        };
        assert_eq!(account.id, "a2");
    }

    #[test]
    fn mention_requires_a_status() {
        let ok = Notification::from_value(json!({
            "id": "n2",
            "type": "mention",
            "account": account("a3"),
            "status": status("s1")
        }));
        assert!(matches!(ok, Some(Notification::Mention { .. })));

        let missing_status = Notification::from_value(json!({
            "id": "n3",
            "type": "mention",
            "account": account("a3")
        }));
        assert!(missing_status.is_none());
    }

    #[test]
    fn vendor_prefixed_tag_is_canonicalized() {
        let n = Notification::from_value(json!({
            "id": "n4",
            "type": "pleroma:emoji_reaction",
            "account": account("a4"),
            "status": status("s2"),
            "emoji": "🦀"
        }))
        .unwrap();
        let Notification::EmojiReaction { emoji, .. } = n else {
            panic!("expected emoji reaction variant");
        };
        assert_eq!(emoji, "🦀");
    }

    #[test]
    fn unknown_tag_fails_only_that_element() {
        let batch = json!([
            { "id": "n5", "type": "follow", "account": account("a5") },
            { "id": "n6", "type": "some_future_type", "account": account("a6") },
            { "id": "n7", "type": "follow", "account": account("a7") }
        ]);
        let parsed: Vec<Notification> = parse_entities(batch);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id(), "n5");
        assert_eq!(parsed[1].id(), "n7");
    }

    #[test]
    fn move_variant_accepts_target_account_alias() {
        let n = Notification::from_value(json!({
            "id": "n8",
            "type": "move",
            "account": account("old"),
            "target_account": account("new")
        }))
        .unwrap();
        let Notification::Move { target, .. } = n else {
            panic!("expected move variant");
        };
        assert_eq!(target.id, "new");
    }
}
