//! Poll entity.

use serde::Deserialize;
use serde_json::Value;

use super::{CustomEmoji, Entity, lift_vendor_fields};
use crate::lenient::{filtered, lenient};

/// A poll attached to a status.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Poll {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub expires_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub expired: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub multiple: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub votes_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub voters_count: Option<u64>,
    #[serde(default, deserialize_with = "filtered")]
    pub options: Vec<PollOption>,
    #[serde(default, deserialize_with = "filtered")]
    pub emojis: Vec<CustomEmoji>,
    #[serde(default, deserialize_with = "lenient")]
    pub voted: bool,
    #[serde(default, deserialize_with = "filtered")]
    pub own_votes: Vec<u64>,
    /// Vendor extension: voters are visible to the poll author.
    #[serde(default, deserialize_with = "lenient")]
    pub non_anonymous: bool,
}

impl Entity for Poll {
    fn preprocess(value: &mut Value) {
        lift_vendor_fields(value, "pleroma", &["non_anonymous"]);
    }
}

/// One poll choice.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PollOption {
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub votes_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_option_is_dropped_not_fatal() {
        let poll = Poll::from_value(json!({
            "id": "p1",
            "options": [
                { "title": "yes", "votes_count": 3 },
                "garbage",
                { "title": "no", "votes_count": 1 }
            ],
            "votes_count": 4
        }))
        .unwrap();
        assert_eq!(poll.options.len(), 2);
        assert_eq!(poll.options[0].title, "yes");
        assert_eq!(poll.options[1].title, "no");
    }
}
