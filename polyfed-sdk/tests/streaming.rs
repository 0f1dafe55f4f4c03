//! Streaming channel behavior against a local websocket server.

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use polyfed::{ChannelState, Client, Entity, StreamingChannel, StreamingEvent};
use polyfed_common::entities::Instance;

/// One-connection websocket echo harness: reports every text frame it
/// receives and forwards frames given to it.
async fn ws_server() -> (
    String,
    mpsc::UnboundedReceiver<String>,
    mpsc::UnboundedSender<String>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<String>();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let socket = accept_async(stream).await.unwrap();
        let (mut sink, mut reader) = socket.split();
        loop {
            tokio::select! {
                frame = reader.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        let _ = inbound_tx.send(text.to_string());
                    }
                    Some(Ok(_)) => {}
                    _ => break,
                },
                outgoing = outbound_rx.recv() => match outgoing {
                    Some(text) => {
                        if sink.send(Message::text(text)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
    });

    (format!("ws://{addr}"), inbound_rx, outbound_tx)
}

fn update_frame(stream: &str, id: &str) -> String {
    let payload = json!({
        "id": id,
        "account": { "id": "a", "username": "u", "acct": "u", "url": "https://x/@u" },
        "content": "hello"
    });
    json!({ "stream": [stream], "event": "update", "payload": payload.to_string() }).to_string()
}

#[tokio::test]
async fn messages_sent_while_connecting_flush_in_order_once_open() {
    let (url, mut inbound, _outbound) = ws_server().await;

    let channel = StreamingChannel::connect(url.parse().unwrap());
    // Both sends race the handshake; whether they are queued or direct,
    // the wire order must match the send order.
    channel.subscribe("user", None, None);
    channel.subscribe("public", None, None);

    let first = inbound.recv().await.unwrap();
    let second = inbound.recv().await.unwrap();
    assert!(first.contains("\"user\""), "got {first}");
    assert!(first.contains("subscribe"));
    assert!(second.contains("\"public\""), "got {second}");

    assert_ne!(channel.state(), ChannelState::Closed);
    channel.close();
    assert_eq!(channel.state(), ChannelState::Closed);
}

#[tokio::test]
async fn inbound_events_fan_out_to_matching_listeners() {
    let (url, _inbound, outbound) = ws_server().await;

    let channel = StreamingChannel::connect(url.parse().unwrap());
    let mut user_events = channel.listen(Some("user".into()));
    let mut public_events = channel.listen(Some("public".into()));
    let mut all_events = channel.listen(None);

    outbound.send(update_frame("user", "s1")).unwrap();

    let (streams, event) = user_events.recv().await.unwrap();
    assert_eq!(streams, vec!["user"]);
    let StreamingEvent::Update(status) = event else {
        panic!("expected update event");
    };
    assert_eq!(status.id, "s1");

    // The unfiltered listener sees it too; the public listener does not.
    let (_, event) = all_events.recv().await.unwrap();
    assert!(matches!(event, StreamingEvent::Update(_)));
    assert!(public_events.try_recv().is_err());
}

#[tokio::test]
async fn unparseable_frames_are_dropped_without_killing_the_stream() {
    let (url, _inbound, outbound) = ws_server().await;

    let channel = StreamingChannel::connect(url.parse().unwrap());
    let mut events = channel.listen(None);

    outbound.send("not json".into()).unwrap();
    outbound
        .send(json!({ "stream": ["user"], "event": "from_the_future", "payload": "{}" }).to_string())
        .unwrap();
    outbound.send(update_frame("user", "s2")).unwrap();

    // Only the valid frame comes through.
    let (_, event) = events.recv().await.unwrap();
    let StreamingEvent::Update(status) = event else {
        panic!("expected update event");
    };
    assert_eq!(status.id, "s2");
}

#[tokio::test]
async fn changing_the_credential_closes_the_channel() {
    let (url, mut inbound, _outbound) = ws_server().await;

    let mut client = Client::new("http://irrelevant.example").unwrap();
    let instance = Instance::from_value(json!({
        "uri": "s.example",
        "version": "2.7.2 (compatible; Pleroma 2.5.0)",
        "urls": { "streaming_api": url }
    }))
    .unwrap();
    client.set_instance(instance);
    client.set_access_token(Some("first".into()));

    client.streaming().unwrap().subscribe("user", None, None);
    // Wait until the subscription reaches the server: channel is live.
    inbound.recv().await.unwrap();
    assert!(matches!(
        client.streaming_state(),
        Some(ChannelState::Open) | Some(ChannelState::Connecting)
    ));

    // Same token: no-op, channel stays.
    client.set_access_token(Some("first".into()));
    assert!(client.streaming_state().is_some());

    // New token: the channel is bound to the old credential and goes away.
    client.set_access_token(Some("second".into()));
    assert!(client.streaming_state().is_none());
}
