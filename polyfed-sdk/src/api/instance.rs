//! Instance metadata.

use reqwest::{Method, StatusCode};

use polyfed_common::Entity;
use polyfed_common::entities::Instance;

use crate::Client;
use crate::errors::{Error, RequestError, Result};
use crate::transport::ApiRequest;

impl Client {
    /// Fetch server metadata and install it as the current snapshot,
    /// recomputing backend identity and capability flags.
    ///
    /// Tries the v2 endpoint first and falls back to v1 on 404; the
    /// canonicalizer reconciles both shapes.
    pub async fn fetch_instance(&mut self) -> Result<&Instance> {
        let raw = match self
            .request_json(ApiRequest::new(Method::GET, "/api/v2/instance"))
            .await
        {
            Ok(raw) => raw,
            Err(Error::Request(RequestError::Server { status, .. }))
                if status == StatusCode::NOT_FOUND =>
            {
                self.request_json(ApiRequest::new(Method::GET, "/api/v1/instance"))
                    .await?
            }
            Err(other) => return Err(other),
        };

        let instance = Instance::from_value(raw).ok_or_else(|| {
            Error::from(RequestError::DecodeJson {
                message: "instance response is not an object".into(),
            })
        })?;
        self.set_instance(instance);
        Ok(self.instance())
    }
}
