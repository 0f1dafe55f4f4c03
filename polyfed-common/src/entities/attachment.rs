//! Media attachments: a tagged variant selected by the `type` field.

use serde::Deserialize;
use serde_json::Value;

use super::{Entity, lift_vendor_fields};
use crate::lenient::lenient;

/// Fields shared by every attachment variant.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AttachmentBase {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub preview_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub remote_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub blurhash: Option<String>,
    /// Vendor extension: concrete MIME type of the file.
    #[serde(default, deserialize_with = "lenient")]
    pub mime_type: Option<String>,
}

/// Per-variant rendering metadata. Kept loose: dialects disagree wildly on
/// the nesting, so consumers read what they need.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MediaMeta {
    #[serde(default)]
    pub original: Value,
    #[serde(default)]
    pub small: Value,
    #[serde(default)]
    pub focus: Value,
}

/// A file attached to a status, discriminated by the `type` tag.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaAttachment {
    Image {
        #[serde(flatten)]
        base: AttachmentBase,
        #[serde(default, deserialize_with = "lenient")]
        meta: MediaMeta,
    },
    Video {
        #[serde(flatten)]
        base: AttachmentBase,
        #[serde(default, deserialize_with = "lenient")]
        meta: MediaMeta,
    },
    Gifv {
        #[serde(flatten)]
        base: AttachmentBase,
        #[serde(default, deserialize_with = "lenient")]
        meta: MediaMeta,
    },
    Audio {
        #[serde(flatten)]
        base: AttachmentBase,
        #[serde(default, deserialize_with = "lenient")]
        meta: MediaMeta,
    },
    Unknown {
        #[serde(flatten)]
        base: AttachmentBase,
    },
}

impl MediaAttachment {
    /// Shared fields regardless of variant.
    pub fn base(&self) -> &AttachmentBase {
        match self {
            MediaAttachment::Image { base, .. }
            | MediaAttachment::Video { base, .. }
            | MediaAttachment::Gifv { base, .. }
            | MediaAttachment::Audio { base, .. }
            | MediaAttachment::Unknown { base } => base,
        }
    }

    /// Attachment id.
    pub fn id(&self) -> &str {
        &self.base().id
    }
}

impl Entity for MediaAttachment {
    fn preprocess(value: &mut Value) {
        lift_vendor_fields(value, "pleroma", &["mime_type"]);

        // Dialects that don't classify uploads report `unknown` (or nothing)
        // while still carrying a usable MIME type; rewrite the tag from it.
        let tag = value.get("type").and_then(Value::as_str).unwrap_or("");
        let known = matches!(tag, "image" | "video" | "gifv" | "audio" | "unknown");
        if !known || tag == "unknown" {
            let from_mime = value
                .get("mime_type")
                .and_then(Value::as_str)
                .and_then(|mime| {
                    mime.split('/').next().and_then(|kind| match kind {
                        "image" => Some("image"),
                        "video" => Some("video"),
                        "audio" => Some("audio"),
                        _ => None,
                    })
                });
            let canonical = from_mime.unwrap_or("unknown");
            if let Some(map) = value.as_object_mut() {
                map.insert("type".into(), Value::String(canonical.into()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vendor_mime_type_rewrites_unknown_tag() {
        let attachment = MediaAttachment::from_value(json!({
            "id": "9",
            "type": "unknown",
            "url": "https://example.social/media/9.png",
            "pleroma": { "mime_type": "image/png" }
        }))
        .unwrap();
        assert!(matches!(attachment, MediaAttachment::Image { .. }));
        assert_eq!(attachment.base().mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn missing_tag_with_no_mime_falls_back_to_unknown() {
        let attachment = MediaAttachment::from_value(json!({
            "id": "10",
            "url": "https://example.social/media/10.bin"
        }))
        .unwrap();
        assert!(matches!(attachment, MediaAttachment::Unknown { .. }));
    }

    #[test]
    fn malformed_meta_degrades() {
        let attachment = MediaAttachment::from_value(json!({
            "id": "11",
            "type": "image",
            "url": "u",
            "meta": "not an object"
        }))
        .unwrap();
        let MediaAttachment::Image { meta, .. } = attachment else {
            panic!("expected image");
        };
        assert!(meta.original.is_null());
    }
}
