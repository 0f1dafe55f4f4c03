//! Streaming channel.
//!
//! A persistent duplex connection, at most one per client, demultiplexing
//! a single message stream into per-subscription listeners. The lifecycle
//! is an explicit state machine: construction moves Unopened→Connecting
//! and starts the handshake; messages sent while Connecting are queued and
//! flushed in order once Open; closing discards listeners and queue.
//! A closed channel is never resurrected — the facade replaces it with a
//! brand-new instance.

use std::sync::{Arc, Mutex};

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use polyfed_common::streaming::{ControlKind, ControlMessage, StreamingEvent, parse_frame};

/// Lifecycle phase of a [`StreamingChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Handshake in progress; outbound messages are being queued.
    Connecting,
    /// Connected; outbound messages go straight to the wire.
    Open,
    /// Terminal. Listeners and queue are gone.
    Closed,
}

enum Inner {
    Connecting { queue: Vec<String> },
    Open { outbound: mpsc::UnboundedSender<String> },
    Closed,
}

struct Shared {
    inner: Mutex<Inner>,
    listeners: Mutex<Vec<Listener>>,
}

struct Listener {
    /// Stream-name filter; `None` receives everything.
    filter: Option<String>,
    sender: mpsc::UnboundedSender<(Vec<String>, StreamingEvent)>,
}

/// A live streaming connection. Owned by the client facade as an explicit
/// optional resource.
pub struct StreamingChannel {
    shared: Arc<Shared>,
    task: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for StreamingChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingChannel")
            .field("state", &self.state())
            .finish()
    }
}

impl StreamingChannel {
    /// Open a channel: transitions Unopened→Connecting immediately and
    /// establishes the underlying connection in the background.
    pub fn connect(url: Url) -> StreamingChannel {
        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner::Connecting { queue: Vec::new() }),
            listeners: Mutex::new(Vec::new()),
        });

        let task = tokio::spawn(run_connection(url, Arc::clone(&shared)));

        StreamingChannel { shared, task }
    }

    /// Current lifecycle phase.
    pub fn state(&self) -> ChannelState {
        match &*self.shared.inner.lock().expect("channel state lock") {
            Inner::Connecting { .. } => ChannelState::Connecting,
            Inner::Open { .. } => ChannelState::Open,
            Inner::Closed => ChannelState::Closed,
        }
    }

    /// Send a control message. Queued while Connecting, dropped after
    /// Closed.
    pub fn send(&self, message: &ControlMessage) {
        let Ok(text) = serde_json::to_string(message) else {
            return;
        };
        let mut inner = self.shared.inner.lock().expect("channel state lock");
        match &mut *inner {
            Inner::Connecting { queue } => queue.push(text),
            Inner::Open { outbound } => {
                // A send failure means the writer is gone; the reader task
                // will flip the state to Closed shortly.
                let _ = outbound.send(text);
            }
            Inner::Closed => {}
        }
    }

    /// Subscribe to a stream by name, with optional `list`/`tag` params.
    pub fn subscribe(&self, stream: &str, list: Option<String>, tag: Option<String>) {
        self.send(&ControlMessage {
            kind: ControlKind::Subscribe,
            stream: stream.to_string(),
            list,
            tag,
        });
    }

    /// Unsubscribe from a stream by name.
    pub fn unsubscribe(&self, stream: &str, list: Option<String>, tag: Option<String>) {
        self.send(&ControlMessage {
            kind: ControlKind::Unsubscribe,
            stream: stream.to_string(),
            list,
            tag,
        });
    }

    /// Register a listener. Events whose `stream` array contains `filter`
    /// (or every event, when `filter` is `None`) are delivered in order.
    pub fn listen(
        &self,
        filter: Option<String>,
    ) -> mpsc::UnboundedReceiver<(Vec<String>, StreamingEvent)> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.shared
            .listeners
            .lock()
            .expect("listener lock")
            .push(Listener { filter, sender });
        receiver
    }

    /// Close the channel: terminal transition, discards all listeners and
    /// any queued messages. Re-opening requires a new channel instance.
    pub fn close(&self) {
        *self.shared.inner.lock().expect("channel state lock") = Inner::Closed;
        self.shared.listeners.lock().expect("listener lock").clear();
        self.task.abort();
    }
}

impl Drop for StreamingChannel {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_connection(url: Url, shared: Arc<Shared>) {
    let (socket, _) = match connect_async(url.as_str()).await {
        Ok(ok) => ok,
        Err(error) => {
            tracing::warn!(%url, %error, "streaming connect failed");
            *shared.inner.lock().expect("channel state lock") = Inner::Closed;
            return;
        }
    };
    let (mut sink, mut stream) = socket.split();

    // Transition Connecting→Open, handing the queued backlog to the writer
    // in its original order.
    let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<String>();
    let backlog = {
        let mut inner = shared.inner.lock().expect("channel state lock");
        let backlog = match &mut *inner {
            Inner::Connecting { queue } => std::mem::take(queue),
            // Closed while connecting: nothing to do.
            _ => {
                return;
            }
        };
        *inner = Inner::Open { outbound };
        backlog
    };
    for text in backlog {
        for_writer(&shared, &mut sink, text).await;
    }

    let writer_shared = Arc::clone(&shared);
    let writer = tokio::spawn(async move {
        while let Some(text) = outbound_rx.recv().await {
            for_writer(&writer_shared, &mut sink, text).await;
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => dispatch(&shared, text.as_str()),
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    writer.abort();
    *shared.inner.lock().expect("channel state lock") = Inner::Closed;
    shared.listeners.lock().expect("listener lock").clear();
}

async fn for_writer<S>(shared: &Arc<Shared>, sink: &mut S, text: String)
where
    S: Sink<Message> + Unpin,
{
    if sink.send(Message::text(text)).await.is_err() {
        *shared.inner.lock().expect("channel state lock") = Inner::Closed;
    }
}

/// Parse one inbound frame and fan it out to every listener whose filter
/// matches. Unparseable frames are dropped with a log line, never an
/// error.
fn dispatch(shared: &Arc<Shared>, text: &str) {
    let Some((streams, event)) = parse_frame(text) else {
        tracing::warn!("dropping unparseable streaming frame");
        return;
    };

    let mut listeners = shared.listeners.lock().expect("listener lock");
    listeners.retain(|listener| {
        let matches = match &listener.filter {
            Some(filter) => streams.iter().any(|s| s == filter),
            None => true,
        };
        if !matches {
            return true;
        }
        // A failed send means the receiver was dropped; forget it.
        listener
            .sender
            .send((streams.clone(), event.clone()))
            .is_ok()
    });
}
