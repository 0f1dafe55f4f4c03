//! Transport behavior against a mock HTTP server.

use httpmock::prelude::*;
use serde_json::json;

use polyfed::{Client, Error, RequestError};

fn client_for(server: &MockServer) -> Client {
    Client::new(&server.base_url()).unwrap()
}

#[tokio::test]
async fn bearer_credential_is_attached() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/accounts/verify_credentials")
                .header("authorization", "Bearer s3cret");
            then.status(200).json_body(json!({
                "id": "1", "username": "me", "acct": "me", "url": "https://x/@me"
            }));
        })
        .await;

    let mut client = client_for(&server);
    client.set_access_token(Some("s3cret".into()));
    let account = client.verify_credentials().await.unwrap();

    mock.assert_async().await;
    assert_eq!(account.id, "1");
}

#[tokio::test]
async fn explicit_query_overrides_path_query_on_the_wire() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/timelines/tag/rust")
                .query_param("limit", "5");
            then.status(200).json_body(json!([]));
        })
        .await;

    let client = client_for(&server);
    let params = polyfed::TimelineParams {
        limit: Some(5),
        ..Default::default()
    };
    client.hashtag_timeline("rust", &params).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn array_parameters_reach_the_wire_in_bracket_notation() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/accounts/relationships")
                .query_param("id[]", "1")
                .query_param("id[]", "2");
            then.status(200).json_body(json!([
                { "id": "1", "following": true },
                { "id": "2", "following": false }
            ]));
        })
        .await;

    let client = client_for(&server);
    let relationships = client.relationships(&["1", "2"]).await.unwrap();

    mock.assert_async().await;
    assert_eq!(relationships.len(), 2);
    assert!(relationships[0].following);
}

#[tokio::test]
async fn non_2xx_raises_structured_server_error_with_envelope() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/accounts/404");
            then.status(404)
                .json_body(json!({ "error": "Record not found" }));
        })
        .await;

    let client = client_for(&server);
    let err = client.account("404").await.unwrap_err();

    let Error::Request(RequestError::Server { status, envelope }) = err else {
        panic!("expected server error, got {err:?}");
    };
    assert_eq!(status.as_u16(), 404);
    assert_eq!(envelope.error_message().as_deref(), Some("Record not found"));
    assert!(envelope.text.contains("Record not found"));
}

#[tokio::test]
async fn alternate_error_key_is_readable_from_the_envelope() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(400)
                .json_body(json!({ "error_description": "invalid grant" }));
        })
        .await;

    let client = client_for(&server);
    let err = client
        .obtain_token("id", "secret", "authorization_code", Some("x"), None)
        .await
        .unwrap_err();

    let Error::Request(RequestError::Server { envelope, .. }) = err else {
        panic!("expected server error");
    };
    assert_eq!(envelope.error_message().as_deref(), Some("invalid grant"));
}

#[tokio::test]
async fn malformed_items_in_a_feed_degrade_instead_of_failing() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/timelines/home");
            then.status(200).json_body(json!([
                { "id": "1", "account": { "id": "a", "username": "u", "acct": "u", "url": "https://x/@u" }, "content": "ok" },
                { "this is": "not a status" },
                { "id": "2", "account": { "id": "a", "username": "u", "acct": "u", "url": "https://x/@u" }, "content": "also ok" }
            ]));
        })
        .await;

    let client = client_for(&server);
    let page = client.home_timeline(&Default::default()).await.unwrap();
    let ids: Vec<&str> = page.items.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn instance_fetch_falls_back_to_v1_and_recomputes_capabilities() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v2/instance");
            then.status(404).json_body(json!({ "error": "unknown route" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/instance");
            then.status(200).json_body(json!({
                "uri": "pleroma.example",
                "title": "Pleroma box",
                "version": "2.7.2 (compatible; Pleroma 2.4.50)",
                "max_toot_chars": 5000,
                "pleroma": { "metadata": { "features": ["pleroma_chat_messages"] } }
            }));
        })
        .await;

    let mut client = client_for(&server);
    client.fetch_instance().await.unwrap();

    assert_eq!(client.backend().software.as_deref(), Some("Pleroma"));
    assert_eq!(client.backend().version, "2.4.50");
    assert!(client.features().chats);
    assert_eq!(client.features().post_character_limit, 5000);
    assert_eq!(client.instance().domain, "pleroma.example");
}

#[tokio::test]
async fn upload_progress_reports_monotonic_byte_counts() {
    use std::sync::{Arc, Mutex};

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/media");
            then.status(200)
                .json_body(json!({ "id": "m1", "type": "image", "url": "https://x/m1.png" }));
        })
        .await;

    let client = client_for(&server);
    let seen: Arc<Mutex<Vec<(u64, Option<u64>)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let attachment = client
        .upload_media(polyfed::UploadMediaParams {
            bytes: vec![0u8; 100_000],
            filename: "pic.png".into(),
            mime: Some("image/png".into()),
            description: None,
            focus: None,
            progress: Some(Arc::new(move |sent, total| {
                sink.lock().unwrap().push((sent, total));
            })),
        })
        .await
        .unwrap();

    assert_eq!(attachment.id(), "m1");
    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
    assert_eq!(seen.last().unwrap().0, 100_000);
    assert_eq!(seen.last().unwrap().1, Some(100_000));
}
