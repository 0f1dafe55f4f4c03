//! Admin endpoints.
//!
//! The reference dialect paginates these with Link headers; the vendor
//! dialect returns an explicit `total` beside the items and takes a
//! `page`/`page_size` pair. Both surface as the same [`Page`].

use polyfed_common::entities::{AdminAccount, AdminReport, StatusTag};

use crate::Client;
use crate::errors::Result;
use crate::paginate::Page;
use crate::transport::Query;

const ADMIN_PAGE_SIZE: u32 = 50;

impl Client {
    /// Accounts known to the server, for moderation.
    pub async fn admin_accounts(&self) -> Result<Page<AdminAccount>> {
        self.require(self.features().admin_accounts, "the admin accounts API")?;
        if self.features().admin_accounts_counted {
            return self
                .get_counted(
                    "/api/v1/pleroma/admin/users",
                    Vec::new(),
                    "users",
                    ADMIN_PAGE_SIZE,
                )
                .await;
        }
        self.get_paged("/api/v1/admin/accounts", Query::new()).await
    }

    /// Open moderation reports.
    pub async fn admin_reports(&self, resolved: Option<bool>) -> Result<Page<AdminReport>> {
        self.require(self.features().admin_reports, "the admin reports API")?;
        if self.features().admin_accounts_counted {
            let mut query = Vec::new();
            if let Some(resolved) = resolved {
                let state = if resolved { "resolved" } else { "open" };
                query.push(("state".to_string(), state.to_string()));
            }
            return self
                .get_counted(
                    "/api/v1/pleroma/admin/reports",
                    query,
                    "reports",
                    ADMIN_PAGE_SIZE,
                )
                .await;
        }
        let query = Query::new().push_opt("resolved", resolved);
        self.get_paged("/api/v1/admin/reports", query).await
    }

    /// Hashtags currently pending trend review.
    pub async fn admin_trending_tags(&self) -> Result<Vec<StatusTag>> {
        self.require(self.features().trends, "trends")?;
        self.get_entities("/api/v1/admin/trends/tags", Query::new()).await
    }
}
