//! Canonical profile entity.

use serde::Deserialize;
use serde_json::Value;

use super::{AccountField, CustomEmoji, Entity, lift_vendor_fields, preprocess_child};
use crate::lenient::{filtered, lenient, lenient_id};

/// Canonical profile. Self-referential through the optional `moved` field;
/// the nested value validates through this same definition, degrading to
/// `None` when invalid.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Account {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient")]
    pub acct: String,
    /// Fully-qualified `user@domain` name, synthesized when the dialect
    /// doesn't provide one.
    #[serde(default, deserialize_with = "lenient")]
    pub fqn: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub note: String,
    #[serde(default, deserialize_with = "lenient")]
    pub avatar: String,
    #[serde(default, deserialize_with = "lenient")]
    pub avatar_static: String,
    #[serde(default, deserialize_with = "lenient")]
    pub header: String,
    #[serde(default, deserialize_with = "lenient")]
    pub header_static: String,
    #[serde(default, deserialize_with = "lenient")]
    pub locked: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub bot: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub group: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub discoverable: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_status_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub followers_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub following_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub statuses_count: u64,
    #[serde(default, deserialize_with = "filtered")]
    pub emojis: Vec<CustomEmoji>,
    #[serde(default, deserialize_with = "filtered")]
    pub fields: Vec<AccountField>,
    #[serde(default, deserialize_with = "lenient")]
    pub moved: Option<Box<Account>>,
    #[serde(default, deserialize_with = "lenient")]
    pub suspended: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub limited: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<AccountSource>,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<AccountRole>,
    /// Vendor extension: whether the account accepts chat messages.
    #[serde(default, deserialize_with = "lenient")]
    pub accepts_chat_messages: Option<bool>,
    /// Vendor extension: ActivityPub actor id.
    #[serde(default, deserialize_with = "lenient")]
    pub ap_id: Option<String>,
    /// Vendor extension: favicon of the account's home instance.
    #[serde(default, deserialize_with = "lenient")]
    pub favicon: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub deactivated: bool,
}

impl Entity for Account {
    fn preprocess(value: &mut Value) {
        lift_vendor_fields(
            value,
            "pleroma",
            &[
                "ap_id",
                "favicon",
                "accepts_chat_messages",
                "deactivated",
                "is_suspended",
            ],
        );
        super::rename_key(value, "is_suspended", "suspended");
        synthesize_acct(value);
        preprocess_child::<Account>(value, "moved");
    }
}

/// Fill in `acct` (and `fqn`) for dialects that only provide a bare
/// username plus a profile URL.
fn synthesize_acct(value: &mut Value) {
    let acct = value.get("acct").and_then(Value::as_str).unwrap_or("");
    if acct.is_empty() {
        let username = value
            .get("username")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        if !username.is_empty() {
            let qualified = value
                .get("url")
                .and_then(Value::as_str)
                .and_then(|u| url::Url::parse(u).ok())
                .and_then(|u| u.host_str().map(str::to_string))
                .map(|host| format!("{username}@{host}"))
                .unwrap_or_else(|| username.clone());
            if let Some(map) = value.as_object_mut() {
                map.insert("acct".into(), Value::String(qualified));
            }
        }
    }

    let acct = value
        .get("acct")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let fqn_missing = !value.get("fqn").is_some_and(|v| v.is_string());
    if fqn_missing && acct.contains('@') {
        if let Some(map) = value.as_object_mut() {
            map.insert("fqn".into(), Value::String(acct));
        }
    }
}

/// Write-side view of the authenticated account's own profile settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AccountSource {
    #[serde(default, deserialize_with = "lenient")]
    pub privacy: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub sensitive: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub note: String,
    #[serde(default, deserialize_with = "filtered")]
    pub fields: Vec<AccountField>,
    #[serde(default, deserialize_with = "lenient")]
    pub follow_requests_count: u64,
}

/// Staff role attached to an account.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AccountRole {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub color: String,
    #[serde(default, deserialize_with = "lenient")]
    pub highlighted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal(id: &str) -> Value {
        json!({ "id": id, "username": "alice", "acct": "alice", "url": "https://example.social/@alice" })
    }

    #[test]
    fn missing_id_rejects_the_account() {
        assert!(Account::from_value(json!({ "username": "alice" })).is_none());
        assert!(Account::from_value(json!("not an object")).is_none());
    }

    #[test]
    fn pleroma_side_channel_is_lifted() {
        let mut payload = minimal("1");
        payload["pleroma"] = json!({
            "ap_id": "https://example.social/users/alice",
            "accepts_chat_messages": true,
            "deactivated": false
        });
        let account = Account::from_value(payload).unwrap();
        assert_eq!(
            account.ap_id.as_deref(),
            Some("https://example.social/users/alice")
        );
        assert_eq!(account.accepts_chat_messages, Some(true));
    }

    #[test]
    fn acct_synthesized_from_username_and_url() {
        let payload = json!({
            "id": "2",
            "username": "bob",
            "url": "https://remote.tld/users/bob"
        });
        let account = Account::from_value(payload).unwrap();
        assert_eq!(account.acct, "bob@remote.tld");
        assert_eq!(account.fqn.as_deref(), Some("bob@remote.tld"));
    }

    #[test]
    fn moved_chain_validates_lazily_and_tolerates_invalid_target() {
        let mut payload = minimal("3");
        payload["moved"] = json!({ "username": "no id here" });
        let account = Account::from_value(payload).unwrap();
        assert!(account.moved.is_none());

        let mut payload = minimal("4");
        payload["moved"] = minimal("5");
        payload["moved"]["moved"] = minimal("6");
        let account = Account::from_value(payload).unwrap();
        let moved = account.moved.unwrap();
        assert_eq!(moved.id, "5");
        assert_eq!(moved.moved.unwrap().id, "6");
    }

    #[test]
    fn malformed_counters_degrade_to_zero() {
        let mut payload = minimal("7");
        payload["followers_count"] = json!("many");
        let account = Account::from_value(payload).unwrap();
        assert_eq!(account.followers_count, 0);
    }
}
