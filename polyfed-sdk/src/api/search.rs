//! Search endpoints.

use polyfed_common::entities::SearchResults;

use crate::Client;
use crate::errors::Result;
use crate::transport::Query;

/// Parameters for `GET /api/v2/search`.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Restrict to one result kind: `accounts`, `statuses`, or `hashtags`.
    pub kind: Option<String>,
    /// Attempt a WebFinger lookup for exact handles/URLs.
    pub resolve: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Restrict status results to one account; requires the
    /// `search_from_account` capability.
    pub account_id: Option<String>,
}

impl Client {
    /// Full-text search across accounts, statuses, and hashtags.
    pub async fn search(&self, q: &str, params: &SearchParams) -> Result<SearchResults> {
        if params.account_id.is_some() {
            self.require(self.features().search_from_account, "scoped search")?;
        }
        let path = if self.features().search_v2 {
            "/api/v2/search"
        } else {
            "/api/v1/search"
        };
        let query = Query::new()
            .push("q", q)
            .push_opt("type", params.kind.as_deref())
            .push_opt("resolve", params.resolve)
            .push_opt("limit", params.limit)
            .push_opt("offset", params.offset)
            .push_opt("account_id", params.account_id.as_deref());
        self.get_entity_with(path, query, "search results").await
    }
}
