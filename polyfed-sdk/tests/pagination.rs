//! Pagination behavior: Link-header cursors and counted pages.

use httpmock::prelude::*;
use serde_json::json;

use polyfed::{Client, Entity};
use polyfed_common::entities::Instance;

fn status(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "account": { "id": "a", "username": "u", "acct": "u", "url": "https://x/@u" },
        "content": "post"
    })
}

fn admin_user(id: u32) -> serde_json::Value {
    json!({ "id": id.to_string(), "nickname": format!("user{id}") })
}

/// Enable the vendor admin dialect so the counted strategy is selected.
fn as_pleroma(client: &mut Client) {
    let instance = Instance::from_value(json!({
        "uri": "pleroma.example",
        "version": "2.7.2 (compatible; Pleroma 2.5.0)"
    }))
    .unwrap();
    client.set_instance(instance);
}

#[tokio::test]
async fn link_header_drives_forward_and_backward_cursors() {
    let server = MockServer::start_async().await;
    let base = server.base_url();

    let next_link = format!("<{base}/api/v1/timelines/home.page2>; rel=\"next\"");
    let prev_link = format!("<{base}/api/v1/timelines/home>; rel=\"prev\"");

    let home = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/timelines/home");
            then.status(200)
                .header("Link", next_link.as_str())
                .json_body(json!([status("9"), status("3")]));
        })
        .await;

    let page2 = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/timelines/home.page2");
            then.status(200)
                .header("Link", prev_link.as_str())
                .json_body(json!([status("2")]));
        })
        .await;

    let client = Client::new(&base).unwrap();
    let page = client.home_timeline(&Default::default()).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert!(page.has_next());
    assert!(!page.has_prev());
    assert!(!page.partial);

    // next() follows the Link URL verbatim.
    let older = page.next().await.unwrap().unwrap();
    assert_eq!(older.items[0].id, "2");
    assert!(older.has_prev());
    page2.assert_async().await;

    // The older page's prev() walks back to the original effective URL.
    let newer = older.prev().await.unwrap().unwrap();
    assert_eq!(newer.items.len(), 2);
    home.assert_hits_async(2).await;

    // Cursors are reusable: a second call issues a second request.
    let again = page.next().await.unwrap().unwrap();
    assert_eq!(again.items[0].id, "2");
    page2.assert_hits_async(2).await;
}

#[tokio::test]
async fn absent_link_relation_means_no_cursor() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/timelines/home");
            then.status(200).json_body(json!([status("1")]));
        })
        .await;

    let client = Client::new(&server.base_url()).unwrap();
    let page = client.home_timeline(&Default::default()).await.unwrap();
    assert!(!page.has_next());
    assert!(!page.has_prev());
    assert!(page.next().await.unwrap().is_none());
    assert!(page.prev().await.unwrap().is_none());
}

#[tokio::test]
async fn partial_content_sets_the_partial_flag() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/timelines/home");
            then.status(206).json_body(json!([status("1")]));
        })
        .await;

    let client = Client::new(&server.base_url()).unwrap();
    let page = client.home_timeline(&Default::default()).await.unwrap();
    assert!(page.partial);
}

#[tokio::test]
async fn counted_pages_stop_exactly_at_the_reported_total() {
    let server = MockServer::start_async().await;

    // total=80, page_size=50: page 1 full, page 2 holds the remaining 30.
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/pleroma/admin/users")
                .query_param("page", "1");
            then.status(200).json_body(json!({
                "total": 80,
                "users": (1..=50).map(admin_user).collect::<Vec<_>>()
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/pleroma/admin/users")
                .query_param("page", "2");
            then.status(200).json_body(json!({
                "total": 80,
                "users": (51..=80).map(admin_user).collect::<Vec<_>>()
            }));
        })
        .await;

    let mut client = Client::new(&server.base_url()).unwrap();
    as_pleroma(&mut client);

    let page1 = client.admin_accounts().await.unwrap();
    assert_eq!(page1.items.len(), 50);
    assert_eq!(page1.total, Some(80));
    assert!(page1.has_next());
    // Page 1 never offers a previous page.
    assert!(!page1.has_prev());

    let page2 = page1.next().await.unwrap().unwrap();
    assert_eq!(page2.items.len(), 30);
    // 50 × 1 + 30 = 80 ≥ total: exhausted.
    assert!(!page2.has_next());
    assert!(page2.has_prev());

    let back = page2.prev().await.unwrap().unwrap();
    assert_eq!(back.items.len(), 50);
}

#[tokio::test]
async fn counted_page_items_run_through_the_filtered_array_policy() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/pleroma/admin/users");
            then.status(200).json_body(json!({
                "total": 3,
                "users": [admin_user(1), "garbage", admin_user(3)]
            }));
        })
        .await;

    let mut client = Client::new(&server.base_url()).unwrap();
    as_pleroma(&mut client);

    let page = client.admin_accounts().await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].username, "user1");
    assert_eq!(page.items[1].username, "user3");
}

#[tokio::test]
async fn vendor_admin_report_shape_is_swapped_into_canonical_fields() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/pleroma/admin/reports");
            then.status(200).json_body(json!({
                "total": 1,
                "reports": [{
                    "id": 7,
                    "actor": { "id": "r", "username": "reporter", "acct": "reporter", "url": "https://x/@r" },
                    "account": { "id": "t", "username": "target", "acct": "target", "url": "https://x/@t" },
                    "content": "spam",
                    "state": "open"
                }]
            }));
        })
        .await;

    let mut client = Client::new(&server.base_url()).unwrap();
    as_pleroma(&mut client);

    let page = client.admin_reports(None).await.unwrap();
    let report = &page.items[0];
    assert_eq!(report.account.as_ref().unwrap().id, "r");
    assert_eq!(report.target_account.as_ref().unwrap().id, "t");
    assert_eq!(report.comment, "spam");
    assert!(!report.action_taken);
}
