//! Read-position markers.

use serde_json::json;

use polyfed_common::entities::Marker;

use crate::Client;
use crate::errors::Result;
use crate::transport::{ApiRequest, Query};

impl Client {
    /// Fetch markers for the given timelines (`home`, `notifications`).
    /// Array-valued parameter, bracket serialized.
    pub async fn markers(&self, timelines: &[&str]) -> Result<Marker> {
        self.require(self.features().markers, "markers")?;
        self.get_entity_with(
            "/api/v1/markers",
            Query::new().push_array("timeline", timelines.iter().copied()),
            "marker",
        )
        .await
    }

    /// Save read positions. Only the provided timelines are updated.
    pub async fn save_markers(
        &self,
        home_last_read: Option<&str>,
        notifications_last_read: Option<&str>,
    ) -> Result<Marker> {
        self.require(self.features().markers, "markers")?;
        let mut body = json!({});
        if let Some(id) = home_last_read {
            body["home"] = json!({ "last_read_id": id });
        }
        if let Some(id) = notifications_last_read {
            body["notifications"] = json!({ "last_read_id": id });
        }
        let value = self
            .request_json(ApiRequest::new(reqwest::Method::POST, "/api/v1/markers").json(body))
            .await?;
        self.entity_from(value, "marker")
    }
}
