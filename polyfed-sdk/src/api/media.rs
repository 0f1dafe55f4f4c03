//! Media upload endpoints.

use reqwest::Method;
use serde_json::json;

use polyfed_common::entities::MediaAttachment;

use crate::Client;
use crate::errors::Result;
use crate::transport::{ApiRequest, FormField, FormValue, ProgressFn};

/// Parameters for a media upload.
pub struct UploadMediaParams {
    pub bytes: Vec<u8>,
    pub filename: String,
    /// Concrete MIME type; also used for the multipart part header.
    pub mime: Option<String>,
    pub description: Option<String>,
    /// Focal point as `x,y` in `[-1, 1]`; requires the `focal_point`
    /// capability.
    pub focus: Option<String>,
    /// Upload progress side channel `(bytes_sent, total)`.
    pub progress: Option<ProgressFn>,
}

impl std::fmt::Debug for UploadMediaParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadMediaParams")
            .field("filename", &self.filename)
            .field("bytes", &self.bytes.len())
            .field("mime", &self.mime)
            .finish()
    }
}

impl Client {
    /// Upload a file as a media attachment. Uses the v2 endpoint when the
    /// backend has it, the v1 endpoint otherwise; multipart either way.
    pub async fn upload_media(&self, params: UploadMediaParams) -> Result<MediaAttachment> {
        if params.focus.is_some() {
            self.require(self.features().focal_point, "focal points")?;
        }

        let mut fields = vec![FormField {
            name: "file".into(),
            value: FormValue::File {
                filename: params.filename,
                bytes: params.bytes,
                mime: params.mime,
            },
        }];
        if let Some(description) = params.description {
            fields.push(FormField {
                name: "description".into(),
                value: FormValue::Text(description),
            });
        }
        if let Some(focus) = params.focus {
            fields.push(FormField {
                name: "focus".into(),
                value: FormValue::Text(focus),
            });
        }

        let path = if self.features().media_v2 {
            "/api/v2/media"
        } else {
            "/api/v1/media"
        };
        let value = self
            .request_json(
                ApiRequest::new(Method::POST, path)
                    .form(fields)
                    .progress(params.progress),
            )
            .await?;
        self.entity_from(value, "media attachment")
    }

    /// Fetch a media attachment (e.g. to poll v2 async processing).
    pub async fn media(&self, id: &str) -> Result<MediaAttachment> {
        self.get_entity(&format!("/api/v1/media/{id}"), "media attachment")
            .await
    }

    /// Update metadata of an uploaded attachment.
    pub async fn update_media(
        &self,
        id: &str,
        description: Option<&str>,
        focus: Option<&str>,
    ) -> Result<MediaAttachment> {
        let mut body = json!({});
        if let Some(description) = description {
            body["description"] = json!(description);
        }
        if let Some(focus) = focus {
            self.require(self.features().focal_point, "focal points")?;
            body["focus"] = json!(focus);
        }
        let value = self
            .request_json(
                ApiRequest::new(Method::PUT, &format!("/api/v1/media/{id}")).json(body),
            )
            .await?;
        self.entity_from(value, "media attachment")
    }
}
