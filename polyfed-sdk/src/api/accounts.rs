//! Account endpoints.

use serde::Serialize;
use serde_json::json;

use polyfed_common::entities::{Account, Relationship, Status};

use crate::Client;
use crate::errors::Result;
use crate::paginate::Page;
use crate::transport::Query;

/// Parameters for `PATCH /api/v1/accounts/update_credentials`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCredentialsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discoverable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_collections: Option<bool>,
}

impl Client {
    /// Verify the bearer credential and return the owning account.
    pub async fn verify_credentials(&self) -> Result<Account> {
        self.get_entity("/api/v1/accounts/verify_credentials", "account")
            .await
    }

    /// Update profile settings of the authenticated account.
    pub async fn update_credentials(&self, params: &UpdateCredentialsParams) -> Result<Account> {
        let body = serde_json::to_value(params).unwrap_or_default();
        let value = self
            .request_json(
                crate::transport::ApiRequest::new(
                    reqwest::Method::PATCH,
                    "/api/v1/accounts/update_credentials",
                )
                .json(body),
            )
            .await?;
        self.entity_from(value, "account")
    }

    /// Fetch an account by id.
    pub async fn account(&self, id: &str) -> Result<Account> {
        self.get_entity(&format!("/api/v1/accounts/{id}"), "account")
            .await
    }

    /// Look up an account by `user@domain` handle.
    ///
    /// Dialects without the lookup endpoint fall back to an exact-match
    /// account search.
    pub async fn lookup_account(&self, acct: &str) -> Result<Account> {
        let direct = self
            .get_entity_with(
                "/api/v1/accounts/lookup",
                Query::new().push("acct", acct),
                "account",
            )
            .await;
        match direct {
            Err(crate::Error::Request(crate::RequestError::Server { status, .. }))
                if status == reqwest::StatusCode::NOT_FOUND =>
            {
                let results = self
                    .search(
                        acct,
                        &super::SearchParams {
                            kind: Some("accounts".into()),
                            resolve: Some(true),
                            limit: Some(1),
                            ..Default::default()
                        },
                    )
                    .await?;
                results
                    .accounts
                    .into_iter()
                    .find(|a| a.acct.eq_ignore_ascii_case(acct))
                    .ok_or_else(|| {
                        crate::Error::from(crate::RequestError::Validation {
                            message: format!("no account matching {acct:?}"),
                        })
                    })
            }
            other => other,
        }
    }

    /// Relationships between the authenticated user and the given
    /// accounts. Array-valued parameter, bracket serialized.
    pub async fn relationships(&self, ids: &[&str]) -> Result<Vec<Relationship>> {
        self.get_entities(
            "/api/v1/accounts/relationships",
            Query::new().push_array("id", ids.iter().copied()),
        )
        .await
    }

    /// Statuses posted by an account.
    pub async fn account_statuses(
        &self,
        id: &str,
        params: &super::TimelineParams,
    ) -> Result<Page<Status>> {
        self.get_paged(&format!("/api/v1/accounts/{id}/statuses"), params.to_query())
            .await
    }

    /// Followers of an account.
    pub async fn followers(&self, id: &str) -> Result<Page<Account>> {
        self.get_paged(&format!("/api/v1/accounts/{id}/followers"), Query::new())
            .await
    }

    /// Accounts an account follows.
    pub async fn following(&self, id: &str) -> Result<Page<Account>> {
        self.get_paged(&format!("/api/v1/accounts/{id}/following"), Query::new())
            .await
    }

    /// Follow an account.
    pub async fn follow(&self, id: &str) -> Result<Relationship> {
        self.post_entity(&format!("/api/v1/accounts/{id}/follow"), json!({}), "relationship")
            .await
    }

    /// Unfollow an account.
    pub async fn unfollow(&self, id: &str) -> Result<Relationship> {
        self.post_entity(&format!("/api/v1/accounts/{id}/unfollow"), json!({}), "relationship")
            .await
    }

    /// Mute an account, optionally for a limited duration (gated: not all
    /// dialects accept `duration`).
    pub async fn mute(&self, id: &str, duration_secs: Option<u64>) -> Result<Relationship> {
        let mut body = json!({});
        if let Some(duration) = duration_secs {
            self.require(self.features().mutes_duration, "timed mutes")?;
            body["duration"] = json!(duration);
        }
        self.post_entity(&format!("/api/v1/accounts/{id}/mute"), body, "relationship")
            .await
    }

    /// Unmute an account.
    pub async fn unmute(&self, id: &str) -> Result<Relationship> {
        self.post_entity(&format!("/api/v1/accounts/{id}/unmute"), json!({}), "relationship")
            .await
    }

    /// Block an account.
    pub async fn block(&self, id: &str) -> Result<Relationship> {
        self.post_entity(&format!("/api/v1/accounts/{id}/block"), json!({}), "relationship")
            .await
    }

    /// Unblock an account.
    pub async fn unblock(&self, id: &str) -> Result<Relationship> {
        self.post_entity(&format!("/api/v1/accounts/{id}/unblock"), json!({}), "relationship")
            .await
    }

    /// Set a private note on an account profile.
    pub async fn set_account_note(&self, id: &str, comment: &str) -> Result<Relationship> {
        self.require(self.features().account_notes, "account notes")?;
        self.post_entity(
            &format!("/api/v1/accounts/{id}/note"),
            json!({ "comment": comment }),
            "relationship",
        )
        .await
    }

    /// Pending follow requests.
    pub async fn follow_requests(&self) -> Result<Page<Account>> {
        self.get_paged("/api/v1/follow_requests", Query::new()).await
    }

    /// Accept a follow request.
    pub async fn authorize_follow_request(&self, id: &str) -> Result<Relationship> {
        self.post_entity(
            &format!("/api/v1/follow_requests/{id}/authorize"),
            json!({}),
            "relationship",
        )
        .await
    }

    /// Reject a follow request.
    pub async fn reject_follow_request(&self, id: &str) -> Result<Relationship> {
        self.post_entity(
            &format!("/api/v1/follow_requests/{id}/reject"),
            json!({}),
            "relationship",
        )
        .await
    }
}
