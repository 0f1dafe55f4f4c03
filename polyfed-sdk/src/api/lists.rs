//! List endpoints.

use serde_json::json;

use polyfed_common::entities::{Account, UserList};

use crate::Client;
use crate::errors::Result;
use crate::paginate::Page;
use crate::transport::{ApiRequest, Query};

impl Client {
    /// All lists of the authenticated user.
    pub async fn lists(&self) -> Result<Vec<UserList>> {
        self.require(self.features().lists, "lists")?;
        self.get_entities("/api/v1/lists", Query::new()).await
    }

    /// Fetch one list.
    pub async fn list(&self, id: &str) -> Result<UserList> {
        self.require(self.features().lists, "lists")?;
        self.get_entity(&format!("/api/v1/lists/{id}"), "list").await
    }

    /// Create a list.
    pub async fn create_list(&self, title: &str) -> Result<UserList> {
        self.require(self.features().lists, "lists")?;
        self.post_entity("/api/v1/lists", json!({ "title": title }), "list")
            .await
    }

    /// Rename a list.
    pub async fn update_list(&self, id: &str, title: &str) -> Result<UserList> {
        self.require(self.features().lists, "lists")?;
        let value = self
            .request_json(
                ApiRequest::new(reqwest::Method::PUT, &format!("/api/v1/lists/{id}"))
                    .json(json!({ "title": title })),
            )
            .await?;
        self.entity_from(value, "list")
    }

    /// Delete a list.
    pub async fn delete_list(&self, id: &str) -> Result<()> {
        self.require(self.features().lists, "lists")?;
        self.request_json(ApiRequest::new(
            reqwest::Method::DELETE,
            &format!("/api/v1/lists/{id}"),
        ))
        .await?;
        Ok(())
    }

    /// Accounts on a list.
    pub async fn list_accounts(&self, id: &str) -> Result<Page<Account>> {
        self.require(self.features().lists, "lists")?;
        self.get_paged(&format!("/api/v1/lists/{id}/accounts"), Query::new())
            .await
    }

    /// Add accounts to a list. Array-valued body parameter.
    pub async fn add_list_accounts(&self, id: &str, account_ids: &[&str]) -> Result<()> {
        self.require(self.features().lists, "lists")?;
        self.request_json(
            ApiRequest::new(reqwest::Method::POST, &format!("/api/v1/lists/{id}/accounts"))
                .json(json!({ "account_ids": account_ids })),
        )
        .await?;
        Ok(())
    }

    /// Remove accounts from a list.
    pub async fn remove_list_accounts(&self, id: &str, account_ids: &[&str]) -> Result<()> {
        self.require(self.features().lists, "lists")?;
        let query = Query::new().push_array("account_ids", account_ids.iter().copied());
        self.request_json(
            ApiRequest::new(reqwest::Method::DELETE, &format!("/api/v1/lists/{id}/accounts"))
                .query(query),
        )
        .await?;
        Ok(())
    }
}
