//! Small shared entities: emojis, fields, cards, lists, markers, reports,
//! and the other leaf shapes referenced by accounts and statuses.

use serde::Deserialize;
use serde_json::Value;

use super::{
    Account, Entity, MediaAttachment, Status, lift_vendor_fields, preprocess_child,
    preprocess_children, rename_key,
};
use crate::lenient::{filtered, lenient, lenient_id};

/// Custom emoji declared by an instance or carried on an entity.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CustomEmoji {
    pub shortcode: String,
    #[serde(default, deserialize_with = "lenient")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub static_url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub visible_in_picker: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
}

impl Entity for CustomEmoji {}

/// Profile metadata field.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AccountField {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub value: String,
    #[serde(default, deserialize_with = "lenient")]
    pub verified_at: Option<String>,
}

impl Entity for AccountField {}

/// Mention of a user within a status.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Mention {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient")]
    pub acct: String,
    #[serde(default, deserialize_with = "lenient")]
    pub url: String,
}

impl Entity for Mention {}

/// Hashtag as carried on a status or returned from trends.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct StatusTag {
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub url: String,
    #[serde(default, deserialize_with = "filtered")]
    pub history: Vec<TagHistory>,
    #[serde(default, deserialize_with = "lenient")]
    pub following: Option<bool>,
}

impl Entity for StatusTag {}

/// One day of hashtag usage history. The reference dialect serializes the
/// counters as strings; others use numbers.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TagHistory {
    #[serde(default, deserialize_with = "lenient_id")]
    pub day: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub uses: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub accounts: Option<String>,
}

/// The application a status was posted from; registration responses also
/// carry the OAuth client credentials.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Application {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub client_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub client_secret: Option<String>,
}

impl Entity for Application {}

/// Rich link preview attached to a status.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PreviewCard {
    #[serde(default, deserialize_with = "lenient")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: String,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub card_type: String,
    #[serde(default, deserialize_with = "lenient")]
    pub author_name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub provider_name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub blurhash: Option<String>,
    /// Trending links carry usage history like hashtags do.
    #[serde(default, deserialize_with = "filtered")]
    pub history: Vec<TagHistory>,
}

impl Entity for PreviewCard {}

/// Relationship between the authenticated user and another account.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Relationship {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub following: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub followed_by: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub blocking: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub blocked_by: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub muting: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub muting_notifications: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub requested: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub domain_blocking: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub endorsed: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub notifying: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub note: String,
    /// Vendor extension: subscription to all posts of the account.
    #[serde(default, deserialize_with = "lenient")]
    pub subscribing: Option<bool>,
}

impl Entity for Relationship {}

/// A user-curated list of accounts.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UserList {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub replies_policy: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub exclusive: Option<bool>,
}

impl Entity for UserList {}

/// Read-position markers for home and notifications timelines.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Marker {
    #[serde(default, deserialize_with = "lenient")]
    pub home: Option<MarkerEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub notifications: Option<MarkerEntry>,
}

impl Entity for Marker {
    fn preprocess(value: &mut Value) {
        // Vendor dialects report the unread notification count beside the
        // marker rather than inside it.
        if let Some(entry) = value.get_mut("notifications") {
            lift_vendor_fields(entry, "pleroma", &["unread_count"]);
        }
    }
}

/// One timeline's read position.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MarkerEntry {
    #[serde(default, deserialize_with = "lenient_id")]
    pub last_read_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub version: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub unread_count: Option<u64>,
}

/// A direct-message conversation.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub unread: bool,
    #[serde(default, deserialize_with = "filtered")]
    pub accounts: Vec<Account>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_status: Option<Box<Status>>,
}

impl Entity for Conversation {
    fn preprocess(value: &mut Value) {
        preprocess_children::<Account>(value, "accounts");
        preprocess_child::<Status>(value, "last_status");
    }
}

/// Server-wide announcement.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Announcement {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient")]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub starts_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub ends_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub all_day: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub read: bool,
    #[serde(default, deserialize_with = "filtered")]
    pub mentions: Vec<Mention>,
    #[serde(default, deserialize_with = "filtered")]
    pub tags: Vec<StatusTag>,
    #[serde(default, deserialize_with = "filtered")]
    pub emojis: Vec<CustomEmoji>,
    #[serde(default, deserialize_with = "filtered")]
    pub reactions: Vec<AnnouncementReaction>,
}

impl Entity for Announcement {}

/// Emoji reaction tallied on an announcement.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AnnouncementReaction {
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub me: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub static_url: Option<String>,
}

impl Entity for AnnouncementReaction {}

/// Emoji reaction tallied on a status (vendor extension).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EmojiReaction {
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub me: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

impl Entity for EmojiReaction {}

/// A report filed against an account.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Report {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub action_taken: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub action_taken_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient")]
    pub comment: String,
    #[serde(default, deserialize_with = "lenient")]
    pub forwarded: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "filtered")]
    pub status_ids: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub target_account: Option<Box<Account>>,
}

impl Entity for Report {
    fn preprocess(value: &mut Value) {
        preprocess_child::<Account>(value, "target_account");
    }
}

/// A status queued for future publishing.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ScheduledStatus {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub scheduled_at: Option<String>,
    /// Raw creation parameters as echoed by the server.
    #[serde(default)]
    pub params: Value,
    #[serde(default, deserialize_with = "filtered")]
    pub media_attachments: Vec<MediaAttachment>,
}

impl Entity for ScheduledStatus {
    fn preprocess(value: &mut Value) {
        preprocess_children::<MediaAttachment>(value, "media_attachments");
    }
}

/// Machine translation of a status.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Translation {
    #[serde(default, deserialize_with = "lenient")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient")]
    pub spoiler_text: String,
    #[serde(default, deserialize_with = "lenient")]
    pub detected_source_language: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub provider: Option<String>,
}

impl Entity for Translation {}

/// Thread context around a status.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Context {
    #[serde(default, deserialize_with = "filtered")]
    pub ancestors: Vec<Status>,
    #[serde(default, deserialize_with = "filtered")]
    pub descendants: Vec<Status>,
}

impl Entity for Context {
    fn preprocess(value: &mut Value) {
        preprocess_children::<Status>(value, "ancestors");
        preprocess_children::<Status>(value, "descendants");
    }
}

/// Combined search results.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SearchResults {
    #[serde(default, deserialize_with = "filtered")]
    pub accounts: Vec<Account>,
    #[serde(default, deserialize_with = "filtered")]
    pub statuses: Vec<Status>,
    #[serde(default, deserialize_with = "filtered")]
    pub hashtags: Vec<StatusTag>,
}

impl Entity for SearchResults {
    fn preprocess(value: &mut Value) {
        preprocess_children::<Account>(value, "accounts");
        preprocess_children::<Status>(value, "statuses");
    }
}

/// OAuth token returned by the token exchange.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Token {
    pub access_token: String,
    #[serde(default, deserialize_with = "lenient")]
    pub token_type: String,
    #[serde(default, deserialize_with = "lenient")]
    pub scope: String,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<u64>,
}

impl Entity for Token {}

/// A pending interaction (reply, boost, favourite) awaiting approval on
/// dialects that gate interactions.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct InteractionRequest {
    pub id: String,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub request_type: String,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub account: Option<Box<Account>>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<Box<Status>>,
    #[serde(default, deserialize_with = "lenient")]
    pub reply: Option<Box<Status>>,
}

impl Entity for InteractionRequest {
    fn preprocess(value: &mut Value) {
        preprocess_child::<Account>(value, "account");
        preprocess_child::<Status>(value, "status");
        preprocess_child::<Status>(value, "reply");
    }
}

/// Server-side content filter.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Filter {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "filtered")]
    pub context: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub expires_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub filter_action: String,
}

impl Entity for Filter {
    fn preprocess(value: &mut Value) {
        // v1 filters carry `phrase` instead of `title` and imply a hide
        // action.
        rename_key(value, "phrase", "title");
    }
}

/// A filter match attached to a status by the server.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FilterResult {
    #[serde(default, deserialize_with = "lenient")]
    pub filter: Option<Filter>,
    #[serde(default, deserialize_with = "filtered")]
    pub keyword_matches: Vec<String>,
    #[serde(default, deserialize_with = "filtered")]
    pub status_matches: Vec<String>,
}

impl Entity for FilterResult {}

/// Relationship severance event payload carried by the matching
/// notification variant.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RelationshipSeveranceEvent {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub event_type: String,
    #[serde(default, deserialize_with = "lenient")]
    pub target_name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub followers_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub following_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
}

/// Moderation warning payload carried by the matching notification variant.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AccountWarning {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub action: String,
    #[serde(default, deserialize_with = "lenient")]
    pub text: String,
    #[serde(default, deserialize_with = "filtered")]
    pub status_ids: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
}
