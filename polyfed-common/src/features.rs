//! The capability matrix.
//!
//! One flat record of named flags derived from `(BackendIdentity,
//! Instance)`. Every flag is independently evaluable — a software equality
//! test, a version-range test scoped to one software, a presence test
//! against the declared feature list, or a configuration read — and a
//! capability reachable through several unrelated dialects is the OR of
//! each dialect's own test. Consumers treat the whole record as a readonly
//! snapshot; it is recomputed whenever the instance snapshot changes and
//! never persisted.

use crate::entities::{Instance, PollsConfig};
use crate::version::{BackendIdentity, software::*};

/// Named capability flags for one instance snapshot.
///
/// Field names are the stable contract surface; additions are fine,
/// renames are not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features {
    pub account_endorsements: bool,
    pub account_moving: bool,
    pub account_notes: bool,
    pub account_subscriptions: bool,
    pub announcements: bool,
    pub announcement_reactions: bool,
    pub birthdays: bool,
    pub blockers_visible: bool,
    pub bookmarks: bool,
    pub bookmark_folders: bool,
    pub chats: bool,
    pub conversations: bool,
    pub edit_statuses: bool,
    pub emoji_reacts: bool,
    pub emoji_reacts_unicode_only: bool,
    pub events: bool,
    pub exclusive_lists: bool,
    pub filters: bool,
    pub filters_v2: bool,
    pub focal_point: bool,
    pub followed_hashtags: bool,
    pub follow_requests: bool,
    pub frontend_configurations: bool,
    pub global_timeline: bool,
    pub group_timelines: bool,
    pub interaction_requests: bool,
    pub lists: bool,
    pub local_only_statuses: bool,
    pub markers: bool,
    pub media_v2: bool,
    pub mutes_duration: bool,
    pub notification_dismiss: bool,
    pub notifications_include_types: bool,
    pub polls: bool,
    pub profile_directory: bool,
    pub profile_fields: bool,
    pub quote_posts: bool,
    pub reactions_api: bool,
    pub remote_interaction: bool,
    pub report_multiple_statuses: bool,
    pub report_rules: bool,
    pub scheduled_statuses: bool,
    pub search_from_account: bool,
    pub search_v2: bool,
    pub severed_relationships: bool,
    pub account_backups: bool,
    pub custom_emoji: bool,
    pub emoji_packs: bool,
    pub familiar_followers: bool,
    pub featured_tags: bool,
    pub instance_v2: bool,
    pub mfm: bool,
    pub moderation_warnings: bool,
    pub notification_requests: bool,
    pub post_languages: bool,
    pub report_forwarding: bool,
    pub status_sources: bool,
    pub webpush: bool,
    pub spoilers: bool,
    pub streaming: bool,
    pub streaming_user_notifications: bool,
    pub suggestions: bool,
    pub suggestions_v2: bool,
    pub translations: bool,
    pub trending_links: bool,
    pub trending_statuses: bool,
    pub trends: bool,
    pub unrestricted_lists: bool,

    // Admin surface.
    pub admin_accounts: bool,
    pub admin_accounts_counted: bool,
    pub admin_reports: bool,

    // Structured flags read from configuration.
    /// Maximum characters per status; the reference default when the
    /// instance doesn't declare one.
    pub post_character_limit: u32,
    /// Maximum media attachments per status.
    pub max_media_attachments: u32,
    /// Declared poll limits, verbatim.
    pub poll_limits: PollsConfig,
    /// MIME types the instance accepts for uploads.
    pub upload_media_types: Vec<String>,
}

impl Features {
    /// Derive the full flag set. Pure; recomputing with the same inputs
    /// yields an identical record.
    pub fn compute(id: &BackendIdentity, instance: &Instance) -> Features {
        let feat = |name: &str| instance.has_feature(name);
        let cfg = &instance.configuration;

        Features {
            account_endorsements: id.gte(MASTODON, "2.5.0")
                || (id.is(PLEROMA) && feat("account_endorsements")),
            account_moving: id.gte(MASTODON, "3.5.0") || id.gte(PLEROMA, "2.4.50"),
            account_notes: id.gte(MASTODON, "3.2.0")
                || id.gte(PLEROMA, "2.4.50")
                || id.gte(GOTOSOCIAL, "0.19.0"),
            account_subscriptions: id.gte(PLEROMA, "1.0.0") || id.is(TOKI),
            announcements: id.gte(MASTODON, "3.1.0")
                || id.gte(PLEROMA, "2.2.49")
                || id.is(TOKI),
            announcement_reactions: id.gte(MASTODON, "3.1.0") || id.gte(PLEROMA, "2.2.49"),
            birthdays: id.gte(PLEROMA, "2.4.50"),
            blockers_visible: feat("blockers_visible"),
            bookmarks: id.gte(MASTODON, "3.1.0")
                || id.gte(PLEROMA, "0.9.9")
                || id.gte(GOTOSOCIAL, "0.12.0")
                || id.is(FRIENDICA),
            bookmark_folders: id.build_is("akkoma") && id.gte(PLEROMA, "2.5.50"),
            chats: id.gte(PLEROMA, "2.1.0") || feat("pleroma_chat_messages"),
            conversations: id.gte(MASTODON, "2.6.0")
                || id.gte(PLEROMA, "0.9.9")
                || id.gte(GOTOSOCIAL, "0.8.0"),
            edit_statuses: id.gte(MASTODON, "3.5.0")
                || (id.build_is("akkoma") && id.gte(PLEROMA, "2.4.50"))
                || id.gte(GOTOSOCIAL, "0.18.0")
                || id.gte(MITRA, "2.9.0"),
            emoji_reacts: id.gte(PLEROMA, "2.0.0")
                || feat("pleroma_emoji_reactions")
                || feat("custom_emoji_reactions")
                || id.gte(MITRA, "2.21.0"),
            emoji_reacts_unicode_only: id.gte(MITRA, "2.21.0") && id.lt(MITRA, "3.3.0"),
            events: feat("events"),
            exclusive_lists: id.gte(MASTODON, "4.2.0"),
            filters: id.lt(MASTODON, "4.0.0") || id.is(PLEROMA),
            filters_v2: id.gte(MASTODON, "4.0.0") || id.gte(GOTOSOCIAL, "0.16.0"),
            focal_point: id.gte(MASTODON, "2.3.0"),
            followed_hashtags: id.gte(MASTODON, "4.0.0") || id.build_is("akkoma"),
            follow_requests: !id.is(MITRA),
            frontend_configurations: id.is(PLEROMA),
            global_timeline: id.is(PLEROMA) || id.is(FIREFISH) || id.is(SHARKEY),
            group_timelines: feat("timelines/group"),
            interaction_requests: id.gte(GOTOSOCIAL, "0.16.0"),
            lists: id.gte(MASTODON, "2.1.0")
                || id.gte(PLEROMA, "0.9.9")
                || id.gte(GOTOSOCIAL, "0.10.0"),
            local_only_statuses: feat("pleroma:local_visibility")
                || id.is(GOTOSOCIAL)
                || id.is(HOMETOWN)
                || id.build_is("glitch"),
            markers: id.gte(MASTODON, "3.0.0") || id.gte(PLEROMA, "2.2.49"),
            media_v2: id.gte(MASTODON, "3.1.3") || id.gte(PLEROMA, "2.2.49"),
            mutes_duration: id.gte(MASTODON, "3.3.0") || id.gte(PLEROMA, "2.4.50"),
            notification_dismiss: id.gte(MASTODON, "2.6.0") || id.is(PLEROMA),
            notifications_include_types: id.gte(MASTODON, "3.5.0")
                || id.gte(PLEROMA, "2.4.50")
                || id.gte(GOTOSOCIAL, "0.18.0"),
            polls: id.gte(MASTODON, "2.8.0")
                || id.is(PLEROMA)
                || id.gte(GOTOSOCIAL, "0.12.0")
                || cfg.polls.max_options.is_some_and(|n| n > 0),
            profile_directory: feat("profile_directory") || id.gte(MASTODON, "3.0.0"),
            profile_fields: id.gte(MASTODON, "2.4.0") || id.is(PLEROMA) || id.is(GOTOSOCIAL),
            quote_posts: feat("quote_posting")
                || id.build_is("akkoma")
                || id.gte(MITRA, "2.9.0")
                || instance.vendor.get("fedibird_capabilities").is_some(),
            reactions_api: feat("pleroma_emoji_reactions") || id.gte(PLEROMA, "2.0.0"),
            remote_interaction: id.is(PLEROMA),
            report_multiple_statuses: !id.is(MITRA),
            report_rules: id.gte(MASTODON, "3.5.0") || id.gte(GOTOSOCIAL, "0.10.0"),
            scheduled_statuses: id.gte(MASTODON, "2.7.0") || id.gte(PLEROMA, "1.0.0"),
            search_from_account: id.gte(MASTODON, "2.8.0") || id.gte(PLEROMA, "1.0.0"),
            search_v2: id.gte(MASTODON, "2.4.1") || id.is(PLEROMA) || id.is(GOTOSOCIAL),
            severed_relationships: id.gte(MASTODON, "4.3.0"),
            account_backups: id.gte(MASTODON, "2.3.0") || id.is(PLEROMA),
            custom_emoji: id.software.is_some(),
            emoji_packs: id.is(PLEROMA),
            familiar_followers: id.gte(MASTODON, "3.5.0"),
            featured_tags: id.gte(MASTODON, "3.0.0"),
            instance_v2: id.gte(MASTODON, "4.0.0")
                || id.gte(GOTOSOCIAL, "0.16.0")
                || (id.build_is("akkoma") && id.gte(PLEROMA, "2.5.50")),
            mfm: feat("mfm") || id.is(FIREFISH) || id.is(SHARKEY),
            moderation_warnings: id.gte(MASTODON, "4.3.0"),
            notification_requests: id.gte(MASTODON, "4.3.0"),
            post_languages: id.gte(MASTODON, "3.0.0") || id.build_is("akkoma"),
            report_forwarding: id.gte(MASTODON, "3.0.0") || id.is(PLEROMA),
            status_sources: id.gte(MASTODON, "3.5.0") || id.gte(GOTOSOCIAL, "0.18.0"),
            webpush: id.gte(MASTODON, "2.4.0") || id.is(PLEROMA) || id.gte(GOTOSOCIAL, "0.17.0"),
            spoilers: !id.is(MITRA),
            streaming: cfg.urls.streaming.is_some()
                || id.is(MASTODON)
                || id.is(PLEROMA)
                || id.gte(GOTOSOCIAL, "0.15.0"),
            streaming_user_notifications: id.gte(MASTODON, "2.4.0") || id.is(PLEROMA),
            suggestions: id.gte(MASTODON, "2.4.3") || feat("v2_suggestions"),
            suggestions_v2: id.gte(MASTODON, "3.4.0") || feat("v2_suggestions"),
            translations: cfg.translation.enabled,
            trending_links: id.gte(MASTODON, "3.5.0"),
            trending_statuses: id.gte(MASTODON, "3.5.0") || id.is(FRIENDICA),
            trends: id.gte(MASTODON, "3.0.0") || id.is(FRIENDICA),
            unrestricted_lists: id.is(PLEROMA),

            admin_accounts: id.gte(MASTODON, "2.9.1") || id.is(PLEROMA),
            admin_accounts_counted: id.is(PLEROMA),
            admin_reports: id.gte(MASTODON, "2.9.1") || id.is(PLEROMA),

            post_character_limit: cfg.statuses.max_characters.unwrap_or(500),
            max_media_attachments: cfg.statuses.max_media_attachments.unwrap_or(4),
            poll_limits: cfg.polls.clone(),
            upload_media_types: cfg.media_attachments.supported_mime_types.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Entity;
    use serde_json::json;

    fn instance(payload: serde_json::Value) -> Instance {
        Instance::from_value(payload).unwrap()
    }

    #[test]
    fn recomputation_is_deterministic() {
        let triples = [
            "4.2.0",
            "2.7.2 (compatible; Pleroma 2.4.50+akkoma)",
            "3.0.0 (compatible; GoToSocial 0.16.0)",
            "4.0.0 (compatible; Mitra 2.21.0)",
            "garbage version",
        ];
        let inst = instance(json!({
            "domain": "x.example",
            "version": "irrelevant",
            "configuration": { "polls": { "max_options": 8 } },
            "pleroma": { "metadata": { "features": ["pleroma_chat_messages"] } }
        }));
        for raw in triples {
            let id = BackendIdentity::parse(raw);
            assert_eq!(
                Features::compute(&id, &inst),
                Features::compute(&id, &inst),
                "flags must be stable for {raw:?}"
            );
        }
    }

    #[test]
    fn unknown_backend_gets_conservative_flags() {
        let id = BackendIdentity::unknown();
        let f = Features::compute(&id, &Instance::default());
        assert!(!f.bookmarks);
        assert!(!f.chats);
        assert!(!f.edit_statuses);
        assert!(!f.trends);
        assert!(!f.admin_reports);
        assert_eq!(f.post_character_limit, 500);
    }

    #[test]
    fn version_range_gates() {
        let old = BackendIdentity::parse("3.4.0");
        let new = BackendIdentity::parse("4.0.0");
        let inst = Instance::default();
        assert!(Features::compute(&old, &inst).filters);
        assert!(!Features::compute(&old, &inst).filters_v2);
        assert!(!Features::compute(&new, &inst).filters);
        assert!(Features::compute(&new, &inst).filters_v2);
    }

    #[test]
    fn cross_dialect_or_combination() {
        let inst = Instance::default();
        let mastodon = BackendIdentity::parse("3.1.0");
        let pleroma = BackendIdentity::parse("2.7.2 (compatible; Pleroma 2.2.49)");
        let gts = BackendIdentity::parse("3.0.0 (compatible; GoToSocial 0.12.0)");
        assert!(Features::compute(&mastodon, &inst).bookmarks);
        assert!(Features::compute(&pleroma, &inst).bookmarks);
        assert!(Features::compute(&gts, &inst).bookmarks);
    }

    #[test]
    fn declared_feature_list_enables_chats() {
        let id = BackendIdentity::parse("2.7.2 (compatible; Toki 0.5.0)");
        let inst = instance(json!({
            "domain": "toki.example",
            "version": "x",
            "pleroma": { "metadata": { "features": ["pleroma_chat_messages"] } }
        }));
        assert!(Features::compute(&id, &inst).chats);
    }

    #[test]
    fn configuration_reads_become_structured_flags() {
        let id = BackendIdentity::parse("4.2.0");
        let inst = instance(json!({
            "domain": "big.example",
            "version": "4.2.0",
            "configuration": {
                "statuses": { "max_characters": 10000, "max_media_attachments": 16 },
                "polls": { "max_options": 12 },
                "media_attachments": { "supported_mime_types": ["image/png"] }
            }
        }));
        let f = Features::compute(&id, &inst);
        assert_eq!(f.post_character_limit, 10000);
        assert_eq!(f.max_media_attachments, 16);
        assert_eq!(f.poll_limits.max_options, Some(12));
        assert!(f.polls);
        assert_eq!(f.upload_media_types, vec!["image/png"]);
    }

    #[test]
    fn akkoma_build_tag_unlocks_fork_features() {
        let id = BackendIdentity::parse("2.7.2 (compatible; Pleroma 2.5.50+akkoma)");
        let f = Features::compute(&id, &Instance::default());
        assert!(f.bookmark_folders);
        assert!(f.followed_hashtags);
        assert!(f.quote_posts);
    }
}
