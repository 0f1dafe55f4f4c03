//! App registration and token exchange.
//!
//! Only the credential plumbing: interactive authorization flows are out
//! of scope, the caller brings the authorization code or password grant.

use serde::Serialize;
use serde_json::json;

use polyfed_common::entities::{Application, Token};

use crate::Client;
use crate::errors::Result;

/// Parameters for `POST /api/v1/apps`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAppParams {
    pub client_name: String,
    pub redirect_uris: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl Client {
    /// Register an OAuth application.
    pub async fn create_app(&self, params: &CreateAppParams) -> Result<Application> {
        let body = serde_json::to_value(params).unwrap_or_default();
        self.post_entity("/api/v1/apps", body, "application").await
    }

    /// Exchange a grant for an access token. The token is *not* installed
    /// on the client; call [`Client::set_access_token`] with it.
    pub async fn obtain_token(
        &self,
        client_id: &str,
        client_secret: &str,
        grant_type: &str,
        code: Option<&str>,
        redirect_uri: Option<&str>,
    ) -> Result<Token> {
        let mut body = json!({
            "client_id": client_id,
            "client_secret": client_secret,
            "grant_type": grant_type,
        });
        if let Some(code) = code {
            body["code"] = json!(code);
        }
        if let Some(redirect_uri) = redirect_uri {
            body["redirect_uri"] = json!(redirect_uri);
        }
        self.post_entity("/oauth/token", body, "token").await
    }

    /// Revoke an access token.
    pub async fn revoke_token(
        &self,
        client_id: &str,
        client_secret: &str,
        token: &str,
    ) -> Result<()> {
        let body = json!({
            "client_id": client_id,
            "client_secret": client_secret,
            "token": token,
        });
        self.request_json(
            crate::transport::ApiRequest::new(reqwest::Method::POST, "/oauth/revoke").json(body),
        )
        .await?;
        Ok(())
    }
}
