//! The client facade.
//!
//! One `Client` per instance. It owns the mutable session state — the
//! access credential, the current instance snapshot with its derived
//! backend identity and capability flags, and the at-most-one streaming
//! channel — and composes the transport, paginated fetcher, and entity
//! validators into the endpoint surface (see the `api` modules).

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use polyfed_common::entities::Instance;
use polyfed_common::{BackendIdentity, Entity, Features};

use crate::channel::StreamingChannel;
use crate::errors::{BuildError, Error, RequestError, Result};
use crate::paginate::{self, Page};
use crate::transport::{ApiRequest, Query, Transport};

/// Configures a [`Client`] before construction.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// # use polyfed::Client;
/// let client = Client::builder("https://mastodon.example")
///     .request_timeout(Duration::from_secs(10))
///     .user_agent_extra("myapp/1.2.3")
///     .build()?;
/// # Ok::<_, polyfed::BuildError>(())
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct ClientBuilder {
    base_url: String,
    request_timeout: Option<Duration>,
    user_agent_extra: Option<String>,
    access_token: Option<String>,
}

impl ClientBuilder {
    /// Start a builder for the given instance base URL.
    pub fn new(base_url: &str) -> ClientBuilder {
        ClientBuilder {
            base_url: base_url.to_string(),
            ..ClientBuilder::default()
        }
    }

    /// Set HTTP requests timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> ClientBuilder {
        self.request_timeout = Some(timeout);
        self
    }

    /// Append an extra user-agent segment after the default
    /// `polyfed@<version>`.
    pub fn user_agent_extra<S: Into<String>>(mut self, extra: S) -> ClientBuilder {
        self.user_agent_extra = Some(extra.into());
        self
    }

    /// Start with a bearer credential already set.
    pub fn access_token<S: Into<String>>(mut self, token: S) -> ClientBuilder {
        self.access_token = Some(token.into());
        self
    }

    /// Build the [`Client`].
    pub fn build(self) -> std::result::Result<Client, BuildError> {
        let mut transport = Transport::build(
            &self.base_url,
            self.request_timeout,
            self.user_agent_extra.as_deref(),
        )?;
        transport.token = self.access_token;

        Ok(Client {
            transport,
            instance: Instance::default(),
            backend: BackendIdentity::unknown(),
            features: Features::default(),
            channel: None,
        })
    }
}

/// Multi-dialect API client.
///
/// Until [`Client::fetch_instance`] succeeds the capability flags stay at
/// their conservative defaults, so endpoint gating treats the backend as
/// entirely unknown.
///
/// All request methods are async and independently cancellable by dropping
/// the returned future; there is no internal queue or throttle.
#[derive(Debug)]
pub struct Client {
    pub(crate) transport: Transport,
    instance: Instance,
    backend: BackendIdentity,
    features: Features,
    pub(crate) channel: Option<StreamingChannel>,
}

impl Client {
    /// Build a client with default settings.
    pub fn new(base_url: &str) -> std::result::Result<Client, BuildError> {
        Client::builder(base_url).build()
    }

    /// Returns a builder to edit settings before creating a [`Client`].
    pub fn builder(base_url: &str) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    // === Session state ===

    /// Current instance snapshot.
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Backend identity derived from the current snapshot.
    pub fn backend(&self) -> &BackendIdentity {
        &self.backend
    }

    /// Capability flags derived from the current snapshot. Read-only;
    /// recomputed whenever the snapshot is replaced.
    pub fn features(&self) -> &Features {
        &self.features
    }

    /// Current bearer credential.
    pub fn access_token(&self) -> Option<&str> {
        self.transport.token.as_deref()
    }

    /// Replace the bearer credential.
    ///
    /// Setting the same value is a no-op. Setting a different value closes
    /// any open streaming channel: the channel is bound to the credential
    /// used at connect time and cannot be re-authenticated in place.
    pub fn set_access_token(&mut self, token: Option<String>) {
        if self.transport.token == token {
            return;
        }
        self.transport.token = token;
        if let Some(channel) = self.channel.take() {
            channel.close();
        }
    }

    /// Lifecycle state of the streaming channel, `None` when no channel
    /// has been opened (or the last one was discarded).
    pub fn streaming_state(&self) -> Option<crate::channel::ChannelState> {
        self.channel.as_ref().map(StreamingChannel::state)
    }

    /// Replace the instance snapshot wholesale and synchronously recompute
    /// the backend identity and capability flags, so no caller can observe
    /// a snapshot paired with stale capabilities.
    pub fn set_instance(&mut self, instance: Instance) {
        self.backend = BackendIdentity::from_instance(&instance.version, &instance.vendor);
        self.features = Features::compute(&self.backend, &instance);
        self.instance = instance;
    }

    // === Request helpers shared by the endpoint modules ===

    pub(crate) fn require(&self, enabled: bool, what: &str) -> Result<()> {
        if enabled {
            return Ok(());
        }
        Err(Error::from(RequestError::Validation {
            message: format!("{what} is not supported by this backend"),
        }))
    }

    pub(crate) fn entity_from<T: Entity>(&self, value: Value, what: &str) -> Result<T> {
        T::from_value(value).ok_or_else(|| {
            Error::from(RequestError::DecodeJson {
                message: format!("response is not a valid {what}"),
            })
        })
    }

    pub(crate) async fn request_json(&self, request: ApiRequest) -> Result<Value> {
        Ok(self.transport.send(request).await?.into_json())
    }

    pub(crate) async fn get_entity<T: Entity>(&self, path: &str, what: &str) -> Result<T> {
        let value = self.request_json(ApiRequest::new(Method::GET, path)).await?;
        self.entity_from(value, what)
    }

    pub(crate) async fn get_entity_with<T: Entity>(
        &self,
        path: &str,
        query: Query,
        what: &str,
    ) -> Result<T> {
        let value = self
            .request_json(ApiRequest::new(Method::GET, path).query(query))
            .await?;
        self.entity_from(value, what)
    }

    pub(crate) async fn post_entity<T: Entity>(
        &self,
        path: &str,
        body: Value,
        what: &str,
    ) -> Result<T> {
        let value = self
            .request_json(ApiRequest::new(Method::POST, path).json(body))
            .await?;
        self.entity_from(value, what)
    }

    pub(crate) async fn delete_entity<T: Entity>(&self, path: &str, what: &str) -> Result<T> {
        let value = self
            .request_json(ApiRequest::new(Method::DELETE, path))
            .await?;
        self.entity_from(value, what)
    }

    pub(crate) async fn get_entities<T: Entity>(&self, path: &str, query: Query) -> Result<Vec<T>> {
        let value = self
            .request_json(ApiRequest::new(Method::GET, path).query(query))
            .await?;
        Ok(T::from_array(value))
    }

    /// Link-header paginated GET.
    pub(crate) async fn get_paged<T: Entity>(&self, path: &str, query: Query) -> Result<Page<T>> {
        paginate::fetch_linked(&self.transport, path, query).await
    }

    /// Counted-page GET for admin-style endpoints.
    pub(crate) async fn get_counted<T: Entity>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
        items_key: &str,
        page_size: u32,
    ) -> Result<Page<T>> {
        paginate::fetch_counted(&self.transport, path, query, items_key, page_size).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyfed_common::entities::Account;
    use serde_json::json;

    fn client() -> Client {
        Client::new("https://example.social").unwrap()
    }

    #[test]
    fn setting_same_token_is_a_noop() {
        let mut c = client();
        c.set_access_token(Some("secret".into()));
        assert_eq!(c.access_token(), Some("secret"));
        // Same value again: nothing observable changes.
        c.set_access_token(Some("secret".into()));
        assert_eq!(c.access_token(), Some("secret"));
        assert!(c.channel.is_none());
    }

    #[test]
    fn replacing_snapshot_recomputes_identity_and_flags_together() {
        let mut c = client();
        assert!(!c.features().bookmarks);

        let instance = Instance::from_value(json!({
            "domain": "example.social",
            "version": "4.2.0",
            "configuration": { "statuses": { "max_characters": 5000 } }
        }))
        .unwrap();
        c.set_instance(instance);

        assert_eq!(c.backend().software.as_deref(), Some("Mastodon"));
        assert!(c.features().bookmarks);
        assert_eq!(c.features().post_character_limit, 5000);
    }

    #[test]
    fn require_gates_with_a_validation_error() {
        let c = client();
        let err = c.require(false, "chats").unwrap_err();
        assert!(matches!(
            err,
            Error::Request(RequestError::Validation { .. })
        ));
    }

    #[test]
    fn entity_from_rejects_non_entity_bodies() {
        let c = client();
        let err = c
            .entity_from::<Account>(json!("just a string"), "account")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Request(RequestError::DecodeJson { .. })
        ));
    }
}
