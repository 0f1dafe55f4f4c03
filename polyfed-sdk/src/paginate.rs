//! Paginated fetching.
//!
//! One interface over two pagination styles: opaque continuation URLs
//! taken verbatim from the `Link` header, and counted pages for the
//! admin-style endpoints that report an explicit total and accept a
//! `page`/`page_size` pair. A page's cursors are reusable; every
//! invocation issues a fresh request and yields a new [`Page`]. A `next`
//! cursor only exists once its originating response (and headers) has
//! resolved, so continuation is causally ordered by construction.

use polyfed_common::Entity;
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::errors::Result;
use crate::transport::{ApiRequest, Envelope, Query, Transport};

/// How to reissue an equivalent request advanced by exactly one page.
#[derive(Debug, Clone)]
enum PageCursor {
    /// Continuation URL taken verbatim from the Link header.
    Link(Url),
    /// Synthesized page number against a counted endpoint. Page numbers
    /// are 1-indexed; an absent page parameter means page 1.
    Counted {
        path: String,
        query: Vec<(String, String)>,
        items_key: String,
        page: u32,
        page_size: u32,
    },
}

/// One page of results plus its bidirectional continuation state.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Validated items; invalid elements were dropped, order preserved.
    pub items: Vec<T>,
    /// True iff the server answered 206 Partial Content.
    pub partial: bool,
    /// Reported total item count (counted endpoints only).
    pub total: Option<u64>,
    next: Option<PageCursor>,
    prev: Option<PageCursor>,
    transport: Transport,
}

impl<T: Entity> Page<T> {
    /// Whether a following page is available.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Whether a preceding page is available.
    pub fn has_prev(&self) -> bool {
        self.prev.is_some()
    }

    /// Fetch the following page, `Ok(None)` when there is none. Calling
    /// this twice issues two network requests.
    pub async fn next(&self) -> Result<Option<Page<T>>> {
        match &self.next {
            Some(cursor) => Ok(Some(fetch_cursor(&self.transport, cursor).await?)),
            None => Ok(None),
        }
    }

    /// Fetch the preceding page, `Ok(None)` when there is none.
    pub async fn prev(&self) -> Result<Option<Page<T>>> {
        match &self.prev {
            Some(cursor) => Ok(Some(fetch_cursor(&self.transport, cursor).await?)),
            None => Ok(None),
        }
    }
}

async fn fetch_cursor<T: Entity>(transport: &Transport, cursor: &PageCursor) -> Result<Page<T>> {
    match cursor {
        PageCursor::Link(url) => fetch_url(transport, url.clone()).await,
        PageCursor::Counted {
            path,
            query,
            items_key,
            page,
            page_size,
        } => fetch_counted_page(transport, path, query, items_key, *page, *page_size).await,
    }
}

/// First fetch of a Link-paginated endpoint.
pub(crate) async fn fetch_linked<T: Entity>(
    transport: &Transport,
    path: &str,
    query: Query,
) -> Result<Page<T>> {
    let envelope = transport
        .send(ApiRequest::new(Method::GET, path).query(query))
        .await?;
    Ok(page_from_linked(transport, envelope))
}

async fn fetch_url<T: Entity>(transport: &Transport, url: Url) -> Result<Page<T>> {
    let envelope = transport
        .send(ApiRequest::new(Method::GET, url.as_str()))
        .await?;
    Ok(page_from_linked(transport, envelope))
}

fn page_from_linked<T: Entity>(transport: &Transport, envelope: Envelope) -> Page<T> {
    let partial = envelope.status == reqwest::StatusCode::PARTIAL_CONTENT;
    let next = envelope.link("next").map(PageCursor::Link);
    let prev = envelope.link("prev").map(PageCursor::Link);
    Page {
        items: T::from_array(envelope.into_json()),
        partial,
        total: None,
        next,
        prev,
        transport: transport.clone(),
    }
}

/// First fetch of a counted endpoint (admin-style): the response body
/// carries the items under `items_key` beside a `total` count.
pub(crate) async fn fetch_counted<T: Entity>(
    transport: &Transport,
    path: &str,
    query: Vec<(String, String)>,
    items_key: &str,
    page_size: u32,
) -> Result<Page<T>> {
    fetch_counted_page(transport, path, &query, items_key, 1, page_size).await
}

async fn fetch_counted_page<T: Entity>(
    transport: &Transport,
    path: &str,
    base_query: &[(String, String)],
    items_key: &str,
    page: u32,
    page_size: u32,
) -> Result<Page<T>> {
    let mut query = Query::new();
    for (k, v) in base_query {
        query = query.push(k, v);
    }
    query = query.push("page", page).push("page_size", page_size);

    let envelope = transport
        .send(ApiRequest::new(Method::GET, path).query(query))
        .await?;
    let partial = envelope.status == reqwest::StatusCode::PARTIAL_CONTENT;
    let body = envelope.into_json();

    let total = body.get("total").and_then(Value::as_u64);
    let items_value = match &body {
        Value::Array(_) => body.clone(),
        _ => body.get(items_key).cloned().unwrap_or(Value::Null),
    };
    let items = T::from_array(items_value);

    // The running count decides whether another page can exist: stop once
    // page_size × (page−1) + items_returned reaches the reported total.
    let seen = u64::from(page_size) * u64::from(page - 1) + items.len() as u64;
    let exhausted = match total {
        Some(total) => seen >= total,
        None => items.is_empty(),
    };

    let make = |page: u32| PageCursor::Counted {
        path: path.to_string(),
        query: base_query.to_vec(),
        items_key: items_key.to_string(),
        page,
        page_size,
    };
    let next = (!exhausted).then(|| make(page + 1));
    let prev = (page > 1).then(|| make(page - 1));

    Ok(Page {
        items,
        partial,
        total,
        next,
        prev,
        transport: transport.clone(),
    })
}
