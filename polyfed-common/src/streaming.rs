//! Streaming wire model.
//!
//! Inbound messages are JSON envelopes `{ "stream": [..], "event": name,
//! "payload": "..." }` where the payload is itself a JSON-encoded string
//! needing a second decode pass before entity validation. Outbound control
//! messages subscribe/unsubscribe one stream.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::{
    Announcement, AnnouncementReaction, Chat, Conversation, Entity, Marker, Notification, Status,
};
use crate::lenient::{filtered, lenient};

/// Outbound control message.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ControlMessage {
    #[serde(rename = "type")]
    pub kind: ControlKind,
    pub stream: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Control message verb.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Subscribe,
    Unsubscribe,
}

/// Raw inbound envelope before event dispatch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamEnvelope {
    #[serde(default, deserialize_with = "filtered")]
    pub stream: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub event: String,
    #[serde(default, deserialize_with = "lenient")]
    pub payload: Option<String>,
}

/// A dialect-normalized streaming event. Closed set keyed by event name;
/// unrecognized names fail only that message.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamingEvent {
    /// A new status entered one of the subscribed timelines.
    Update(Box<Status>),
    /// An already-delivered status was edited.
    StatusUpdate(Box<Status>),
    /// A status was deleted; payload is its id.
    Delete(String),
    Notification(Box<Notification>),
    Conversation(Box<Conversation>),
    Announcement(Box<Announcement>),
    AnnouncementReaction(AnnouncementReaction),
    /// An announcement was deleted; payload is its id.
    AnnouncementDelete(String),
    MarkerUpdated(Marker),
    ChatUpdate(Box<Chat>),
    /// Server-side filters changed; carries no payload.
    FiltersChanged,
}

/// Strip vendor prefixes from event names before dispatch. Pure string
/// transform, kept separate from per-variant validation.
pub fn canonical_event_name(event: &str) -> &str {
    event.strip_prefix("pleroma:").unwrap_or(event)
}

/// Parse one inbound text frame into `(streams, event)`.
///
/// Returns `None` for frames that aren't envelopes, carry an unknown event
/// name, or whose payload fails its second decode — a dropped message,
/// never a batch failure.
pub fn parse_frame(text: &str) -> Option<(Vec<String>, StreamingEvent)> {
    let envelope: StreamEnvelope = serde_json::from_str(text).ok()?;
    let event = decode_event(&envelope)?;
    Some((envelope.stream, event))
}

fn decode_event(envelope: &StreamEnvelope) -> Option<StreamingEvent> {
    let name = canonical_event_name(&envelope.event);

    // Deletion events carry the bare id as the payload, not JSON.
    if name == "delete" {
        return Some(StreamingEvent::Delete(raw_payload(envelope)?));
    }
    if name == "announcement.delete" {
        return Some(StreamingEvent::AnnouncementDelete(raw_payload(envelope)?));
    }
    if name == "filters_changed" {
        return Some(StreamingEvent::FiltersChanged);
    }

    // Everything else requires the second decode pass.
    let payload: Value = serde_json::from_str(envelope.payload.as_deref()?).ok()?;
    match name {
        "update" => Status::from_value(payload).map(Box::new).map(StreamingEvent::Update),
        "status.update" => Status::from_value(payload)
            .map(Box::new)
            .map(StreamingEvent::StatusUpdate),
        "notification" => Notification::from_value(payload)
            .map(Box::new)
            .map(StreamingEvent::Notification),
        "conversation" => Conversation::from_value(payload)
            .map(Box::new)
            .map(StreamingEvent::Conversation),
        "announcement" => Announcement::from_value(payload)
            .map(Box::new)
            .map(StreamingEvent::Announcement),
        "announcement.reaction" => {
            AnnouncementReaction::from_value(payload).map(StreamingEvent::AnnouncementReaction)
        }
        "marker" => Marker::from_value(payload).map(StreamingEvent::MarkerUpdated),
        "chat_update" => Chat::from_value(payload).map(Box::new).map(StreamingEvent::ChatUpdate),
        _ => None,
    }
}

fn raw_payload(envelope: &StreamEnvelope) -> Option<String> {
    let raw = envelope.payload.as_deref()?.trim();
    if raw.is_empty() {
        return None;
    }
    // Ids may arrive bare or JSON-quoted depending on the dialect.
    Some(
        serde_json::from_str::<Value>(raw)
            .ok()
            .and_then(|v| match v {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| raw.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(event: &str, payload: Value) -> String {
        json!({
            "stream": ["user"],
            "event": event,
            "payload": payload.to_string()
        })
        .to_string()
    }

    fn status_payload() -> Value {
        json!({
            "id": "s1",
            "account": { "id": "a1", "username": "u", "acct": "u", "url": "https://x.example/@u" },
            "content": "hi"
        })
    }

    #[test]
    fn update_event_double_decodes_payload() {
        let (streams, event) = parse_frame(&envelope("update", status_payload())).unwrap();
        assert_eq!(streams, vec!["user"]);
        let StreamingEvent::Update(status) = event else {
            panic!("expected update");
        };
        assert_eq!(status.id, "s1");
    }

    #[test]
    fn vendor_prefix_is_stripped_before_dispatch() {
        let chat = json!({
            "id": "c1",
            "account": { "id": "a1", "username": "u", "acct": "u", "url": "https://x.example/@u" },
            "unread": 1
        });
        let (_, event) = parse_frame(&envelope("pleroma:chat_update", chat)).unwrap();
        assert!(matches!(event, StreamingEvent::ChatUpdate(_)));
    }

    #[test]
    fn delete_event_takes_bare_id() {
        let frame = json!({ "stream": ["public"], "event": "delete", "payload": "123" });
        let (_, event) = parse_frame(&frame.to_string()).unwrap();
        assert_eq!(event, StreamingEvent::Delete("123".into()));
    }

    #[test]
    fn filters_changed_has_no_payload() {
        let frame = json!({ "stream": ["user"], "event": "filters_changed" });
        let (_, event) = parse_frame(&frame.to_string()).unwrap();
        assert_eq!(event, StreamingEvent::FiltersChanged);
    }

    #[test]
    fn unknown_event_is_dropped() {
        assert!(parse_frame(&envelope("totally_new", json!({}))).is_none());
        assert!(parse_frame("not json at all").is_none());
    }

    #[test]
    fn control_message_serialization() {
        let msg = ControlMessage {
            kind: ControlKind::Subscribe,
            stream: "hashtag".into(),
            list: None,
            tag: Some("rust".into()),
        };
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            v,
            json!({ "type": "subscribe", "stream": "hashtag", "tag": "rust" })
        );
    }
}
