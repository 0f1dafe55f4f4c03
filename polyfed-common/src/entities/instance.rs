//! Instance snapshot: canonicalized server metadata.
//!
//! The v2 instance shape is canonical; v1 payloads (and the vendor blocks
//! some dialects bolt onto either) are reshaped in preprocessing. A new
//! snapshot always replaces the previous one wholesale.

use serde::Deserialize;
use serde_json::Value;

use super::{Account, Entity, CustomEmoji, preprocess_child, rename_key};
use crate::lenient::{filtered, lenient};

/// Canonicalized server metadata.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Instance {
    #[serde(default, deserialize_with = "lenient")]
    pub domain: String,
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient")]
    pub source_url: Option<String>,
    #[serde(default, deserialize_with = "filtered")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub registrations: InstanceRegistrations,
    #[serde(default, deserialize_with = "lenient")]
    pub contact: InstanceContact,
    #[serde(default, deserialize_with = "lenient")]
    pub configuration: InstanceConfiguration,
    #[serde(default, deserialize_with = "lenient")]
    pub stats: InstanceStats,
    #[serde(default, deserialize_with = "filtered")]
    pub rules: Vec<InstanceRule>,
    #[serde(default, deserialize_with = "filtered")]
    pub custom_emojis: Vec<CustomEmoji>,
    /// Extension feature names declared by the dialect (lifted from the
    /// vendor metadata block).
    #[serde(default, deserialize_with = "filtered")]
    pub features: Vec<String>,
    /// Raw per-dialect metadata blocks, kept verbatim for capability
    /// derivation and backend identification.
    #[serde(default)]
    pub vendor: Value,
}

impl Instance {
    /// Presence test against the declared extension-feature name list.
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|f| f == name)
    }
}

impl Entity for Instance {
    fn preprocess(value: &mut Value) {
        collect_vendor_blocks(value);
        ensure_object(value, "configuration");
        if value.get("uri").is_some() && value.get("domain").is_none() {
            reshape_v1(value);
        }
        lift_feature_names(value);
        lift_pleroma_limits(value);
        if let Some(contact) = value.get_mut("contact") {
            preprocess_child::<Account>(contact, "account");
        }
    }
}

/// Replace a missing or non-object `key` with an empty object so the
/// rewrites below can index into it without panicking.
fn ensure_object(value: &mut Value, key: &str) {
    let Some(map) = value.as_object_mut() else {
        return;
    };
    let needs_reset = !map.get(key).is_some_and(Value::is_object);
    if needs_reset {
        map.insert(key.to_string(), Value::Object(serde_json::Map::new()));
    }
}

/// Gather the vendor metadata blocks under a single `vendor` key, keeping
/// the originals in place for the lifts below.
fn collect_vendor_blocks(value: &mut Value) {
    let mut vendor = serde_json::Map::new();
    for key in ["pleroma", "ditto", "fedibird_capabilities"] {
        if let Some(block) = value.get(key) {
            if !block.is_null() {
                vendor.insert(key.to_string(), block.clone());
            }
        }
    }
    if let Some(map) = value.as_object_mut() {
        map.insert("vendor".into(), Value::Object(vendor));
    }
}

/// Map the v1 instance shape onto the canonical (v2) field layout.
fn reshape_v1(value: &mut Value) {
    rename_key(value, "uri", "domain");
    let description_empty = value
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("")
        .is_empty();
    if description_empty {
        if let Some(map) = value.as_object_mut() {
            map.remove("description");
        }
        rename_key(value, "short_description", "description");
    }

    // v1: `registrations` is a bare bool beside `approval_required`.
    let enabled = value.get("registrations").and_then(Value::as_bool);
    if let Some(enabled) = enabled {
        let approval = value
            .get("approval_required")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        value["registrations"] = serde_json::json!({
            "enabled": enabled,
            "approval_required": approval,
        });
    }

    // v1: contact is flattened into `email` + `contact_account`.
    let email = value.get("email").cloned().unwrap_or(Value::Null);
    let contact_account = value.get("contact_account").cloned().unwrap_or(Value::Null);
    if value.get("contact").is_none() && (!email.is_null() || !contact_account.is_null()) {
        value["contact"] = serde_json::json!({
            "email": email,
            "account": contact_account,
        });
    }

    // v1: streaming endpoint under `urls.streaming_api`.
    if let Some(streaming) = value
        .pointer("/urls/streaming_api")
        .and_then(Value::as_str)
        .map(str::to_string)
    {
        value["configuration"]["urls"] = serde_json::json!({ "streaming": streaming });
    }

    // Character limit reported at the top level by several dialects.
    if let Some(max) = value.get("max_toot_chars").cloned() {
        let config = &mut value["configuration"]["statuses"];
        if config.get("max_characters").is_none() {
            config["max_characters"] = max;
        }
    }

    // Vendor poll limits use different key names than the canonical config.
    if let Some(limits) = value.get("poll_limits").cloned() {
        let polls = &mut value["configuration"]["polls"];
        if polls.is_null() {
            *polls = serde_json::json!({});
        }
        for (from, to) in [
            ("max_options", "max_options"),
            ("max_option_chars", "max_characters_per_option"),
            ("min_expiration", "min_expiration"),
            ("max_expiration", "max_expiration"),
        ] {
            if polls.get(to).is_none() {
                if let Some(v) = limits.get(from) {
                    polls[to] = v.clone();
                }
            }
        }
    }
}

/// Lift `pleroma.metadata.features` into the canonical feature-name list.
fn lift_feature_names(value: &mut Value) {
    if value.get("features").is_some_and(|v| v.is_array()) {
        return;
    }
    if let Some(features) = value.pointer("/pleroma/metadata/features").cloned() {
        value["features"] = features;
    }
}

/// Nested pleroma configuration that belongs in the canonical config.
fn lift_pleroma_limits(value: &mut Value) {
    if let Some(enabled) = value
        .pointer("/pleroma/metadata/translation/allow_unauthenticated")
        .cloned()
    {
        if value.pointer("/configuration/translation").is_none() {
            value["configuration"]["translation"] = serde_json::json!({ "enabled": enabled });
        }
    }
}

/// Registration policy.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct InstanceRegistrations {
    #[serde(default, deserialize_with = "lenient")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub approval_required: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
}

/// Administrative contact.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct InstanceContact {
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub account: Option<Box<Account>>,
}

/// Declared configuration limits.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct InstanceConfiguration {
    #[serde(default, deserialize_with = "lenient")]
    pub statuses: StatusesConfig,
    #[serde(default, deserialize_with = "lenient")]
    pub media_attachments: MediaConfig,
    #[serde(default, deserialize_with = "lenient")]
    pub polls: PollsConfig,
    #[serde(default, deserialize_with = "lenient")]
    pub translation: TranslationConfig,
    #[serde(default, deserialize_with = "lenient")]
    pub urls: InstanceUrls,
}

/// Status composition limits.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct StatusesConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub max_characters: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_media_attachments: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub characters_reserved_per_url: Option<u32>,
}

/// Upload limits.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MediaConfig {
    #[serde(default, deserialize_with = "filtered")]
    pub supported_mime_types: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_size_limit: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub video_size_limit: Option<u64>,
}

/// Poll limits.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PollsConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub max_options: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_characters_per_option: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub min_expiration: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_expiration: Option<u64>,
}

/// Translation backend availability.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TranslationConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub enabled: bool,
}

/// Well-known endpoint URLs.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct InstanceUrls {
    #[serde(default, deserialize_with = "lenient")]
    pub streaming: Option<String>,
}

/// Aggregate counters (v1 shape, kept where dialects report them).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct InstanceStats {
    #[serde(default, deserialize_with = "lenient")]
    pub user_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub status_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub domain_count: u64,
}

/// One server rule.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct InstanceRule {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn v1_shape_is_reconciled() {
        let instance = Instance::from_value(json!({
            "uri": "example.social",
            "title": "Example",
            "short_description": "a test box",
            "version": "2.7.2 (compatible; Pleroma 2.6.0)",
            "registrations": true,
            "approval_required": true,
            "email": "admin@example.social",
            "urls": { "streaming_api": "wss://example.social" },
            "max_toot_chars": 5000,
            "poll_limits": { "max_options": 20, "max_option_chars": 200 },
            "pleroma": { "metadata": { "features": ["pleroma_api", "chat"] } }
        }))
        .unwrap();

        assert_eq!(instance.domain, "example.social");
        assert_eq!(instance.description, "a test box");
        assert!(instance.registrations.enabled);
        assert!(instance.registrations.approval_required);
        assert_eq!(instance.contact.email.as_deref(), Some("admin@example.social"));
        assert_eq!(
            instance.configuration.urls.streaming.as_deref(),
            Some("wss://example.social")
        );
        assert_eq!(instance.configuration.statuses.max_characters, Some(5000));
        assert_eq!(instance.configuration.polls.max_options, Some(20));
        assert_eq!(
            instance.configuration.polls.max_characters_per_option,
            Some(200)
        );
        assert!(instance.has_feature("chat"));
        assert!(instance.vendor.get("pleroma").is_some());
    }

    #[test]
    fn v2_shape_passes_through() {
        let instance = Instance::from_value(json!({
            "domain": "mastodon.example",
            "title": "Mastodon",
            "version": "4.2.0",
            "registrations": { "enabled": true, "approval_required": false },
            "configuration": {
                "statuses": { "max_characters": 500 },
                "polls": { "max_options": 4 }
            }
        }))
        .unwrap();
        assert_eq!(instance.domain, "mastodon.example");
        assert!(instance.registrations.enabled);
        assert_eq!(instance.configuration.statuses.max_characters, Some(500));
    }

    #[test]
    fn snapshot_survives_malformed_configuration() {
        let instance = Instance::from_value(json!({
            "domain": "odd.example",
            "version": "4.2.0",
            "configuration": "oops"
        }))
        .unwrap();
        assert_eq!(instance.configuration, InstanceConfiguration::default());
    }
}
