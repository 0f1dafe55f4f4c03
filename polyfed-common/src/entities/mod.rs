//! Canonical entities.
//!
//! Every dialect's wire payloads are reconciled into the single in-memory
//! shape defined here. Each entity validates in two stages: a preprocessing
//! rewrite that lifts vendor side-channel fields into canonical names, then
//! structural validation with per-field fallback (see [`crate::lenient`]).

use serde::de::DeserializeOwned;
use serde_json::Value;

mod account;
mod admin;
mod attachment;
mod chat;
mod instance;
mod misc;
mod notification;
mod poll;
mod status;

pub use account::{Account, AccountRole, AccountSource};
pub use admin::{AdminAccount, AdminReport};
pub use attachment::{AttachmentBase, MediaAttachment, MediaMeta};
pub use chat::{Chat, ChatMessage};
pub use instance::{
    Instance, InstanceConfiguration, InstanceContact, InstanceRegistrations, InstanceRule,
    InstanceStats, InstanceUrls, MediaConfig, PollsConfig, StatusesConfig, TranslationConfig,
};
pub use misc::{
    AccountField, AccountWarning, Announcement, AnnouncementReaction, Application, Context,
    Conversation, CustomEmoji, EmojiReaction, Filter, FilterResult, InteractionRequest, Marker,
    MarkerEntry, Mention, PreviewCard, Relationship, RelationshipSeveranceEvent, Report,
    ScheduledStatus, SearchResults, StatusTag, TagHistory, Token, Translation, UserList,
};
pub use notification::Notification;
pub use poll::{Poll, PollOption};
pub use status::{Status, Visibility};

/// A canonical entity parsed from a heterogeneous wire payload.
///
/// `from_value` is total over well-formed JSON: it returns `None` instead of
/// erroring when the payload cannot carry the entity at all (not an object,
/// missing discriminator or required id), and otherwise degrades field by
/// field.
pub trait Entity: DeserializeOwned {
    /// Dialect adaptation pass: lift, rename, and reshape vendor-specific
    /// side-channel fields into the canonical names before validation.
    fn preprocess(_value: &mut Value) {}

    /// Parse a single entity from a raw payload value.
    fn from_value(mut value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Self::preprocess(&mut value);
        serde_json::from_value(value).ok()
    }

    /// Parse an array payload with the filtered-array policy: invalid
    /// elements are dropped, survivors keep their relative order.
    fn from_array(value: Value) -> Vec<Self> {
        match value {
            Value::Array(elements) => elements.into_iter().filter_map(Self::from_value).collect(),
            _ => Vec::new(),
        }
    }
}

/// Move `value[from]` to `value[to]` unless the target is already set.
pub(crate) fn rename_key(value: &mut Value, from: &str, to: &str) {
    let Some(map) = value.as_object_mut() else {
        return;
    };
    if map.get(to).is_some_and(|v| !v.is_null()) {
        return;
    }
    if let Some(v) = map.remove(from) {
        if !v.is_null() {
            map.insert(to.to_string(), v);
        }
    }
}

/// Lift selected keys out of a nested vendor block (e.g. `pleroma`) into
/// the top level, without clobbering canonical fields that are already
/// present.
pub(crate) fn lift_vendor_fields(value: &mut Value, block: &str, keys: &[&str]) {
    let Some(map) = value.as_object_mut() else {
        return;
    };
    let Some(vendor) = map.get(block).and_then(Value::as_object).cloned() else {
        return;
    };
    for key in keys {
        if map.get(*key).is_some_and(|v| !v.is_null()) {
            continue;
        }
        if let Some(v) = vendor.get(*key) {
            if !v.is_null() {
                map.insert((*key).to_string(), v.clone());
            }
        }
    }
}

/// Run `T::preprocess` on a nested child value if present.
pub(crate) fn preprocess_child<T: Entity>(value: &mut Value, key: &str) {
    if let Some(child) = value.get_mut(key) {
        if child.is_object() {
            T::preprocess(child);
        }
    }
}

/// Run `T::preprocess` on every element of a nested array.
pub(crate) fn preprocess_children<T: Entity>(value: &mut Value, key: &str) {
    if let Some(Value::Array(elements)) = value.get_mut(key) {
        for element in elements {
            if element.is_object() {
                T::preprocess(element);
            }
        }
    }
}
