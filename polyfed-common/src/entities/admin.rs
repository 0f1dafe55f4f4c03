//! Admin-API entities.
//!
//! Two wire shapes exist for each: the reference admin API wraps the
//! regular account inside an envelope, while the vendor dialect uses its
//! own field names outright. Both reconcile here.

use serde::Deserialize;
use serde_json::Value;

use super::{Account, Entity, Status, preprocess_child, preprocess_children, rename_key};
use crate::lenient::{filtered, lenient, lenient_id};

/// Administrative view of an account.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AdminAccount {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub confirmed: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub approved: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub disabled: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub silenced: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub suspended: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub account: Option<Box<Account>>,
}

impl Entity for AdminAccount {
    fn preprocess(value: &mut Value) {
        // Vendor shape: `nickname` instead of `username`, `is_active`
        // instead of the suspended/disabled pair.
        rename_key(value, "nickname", "username");
        if let Some(active) = value.get("is_active").and_then(Value::as_bool) {
            if let Some(map) = value.as_object_mut() {
                map.entry("disabled").or_insert(Value::Bool(!active));
            }
        }
        rename_key(value, "is_confirmed", "confirmed");
        rename_key(value, "is_approved", "approved");
        preprocess_child::<Account>(value, "account");
    }
}

/// Administrative view of a report.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AdminReport {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub action_taken: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient")]
    pub comment: String,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub account: Option<Box<Account>>,
    #[serde(default, deserialize_with = "lenient")]
    pub target_account: Option<Box<Account>>,
    #[serde(default, deserialize_with = "filtered")]
    pub statuses: Vec<Status>,
}

impl Entity for AdminReport {
    fn preprocess(value: &mut Value) {
        // A report carrying `actor` is the alternate dialect's shape:
        // reporter under `actor`, target under `account`, free text under
        // `content`, and a `state` string instead of the boolean.
        if value.get("actor").is_some() {
            rename_key(value, "account", "target_account");
            rename_key(value, "actor", "account");
            rename_key(value, "content", "comment");
            if let Some(state) = value.get("state").and_then(Value::as_str) {
                let resolved = state == "resolved";
                if let Some(map) = value.as_object_mut() {
                    map.insert("action_taken".into(), Value::Bool(resolved));
                }
            }
        }

        // The reference admin API nests the plain account one level down.
        for key in ["account", "target_account"] {
            let wrapped = value
                .get(key)
                .and_then(|v| v.get("account"))
                .is_some_and(Value::is_object);
            if wrapped {
                let inner = value[key]["account"].take();
                value[key] = inner;
            }
        }

        preprocess_child::<Account>(value, "account");
        preprocess_child::<Account>(value, "target_account");
        preprocess_children::<Status>(value, "statuses");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account(id: &str) -> Value {
        json!({ "id": id, "username": "u", "acct": "u", "url": "https://x.example/@u" })
    }

    #[test]
    fn alternate_dialect_report_fields_are_swapped() {
        let report = AdminReport::from_value(json!({
            "id": 17,
            "actor": account("reporter"),
            "account": account("target"),
            "content": "spam",
            "state": "resolved",
            "statuses": []
        }))
        .unwrap();

        assert_eq!(report.id.as_deref(), Some("17"));
        assert_eq!(report.account.unwrap().id, "reporter");
        assert_eq!(report.target_account.unwrap().id, "target");
        assert_eq!(report.comment, "spam");
        assert!(report.action_taken);
    }

    #[test]
    fn reference_report_unwraps_admin_account_envelopes() {
        let report = AdminReport::from_value(json!({
            "id": "18",
            "action_taken": false,
            "comment": "",
            "account": { "id": "aa1", "username": "u", "account": account("inner1") },
            "target_account": { "id": "aa2", "username": "v", "account": account("inner2") }
        }))
        .unwrap();
        assert_eq!(report.account.unwrap().id, "inner1");
        assert_eq!(report.target_account.unwrap().id, "inner2");
    }

    #[test]
    fn vendor_admin_account_shape() {
        let acct = AdminAccount::from_value(json!({
            "id": "5",
            "nickname": "eve",
            "is_active": false,
            "is_confirmed": true
        }))
        .unwrap();
        assert_eq!(acct.username, "eve");
        assert!(acct.disabled);
        assert!(acct.confirmed);
    }
}
