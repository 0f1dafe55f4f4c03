//! # polyfed
//!
//! One typed client surface over a dozen mutually-incompatible fediverse
//! server dialects: the reference implementation and its forks, each with
//! different field names, optional features, pagination styles, and error
//! shapes.
//!
//! The moving parts:
//! - **Backend identification** ([`BackendIdentity`]) parses the instance
//!   version string into a structured identity.
//! - **Capability matrix** ([`Features`]) derives named flags from the
//!   identity plus raw instance metadata; every request shape is gated on
//!   them.
//! - **Entity validators** (`polyfed_common::entities`) reconcile
//!   heterogeneous wire payloads into canonical shapes, degrading
//!   gracefully instead of failing whole payloads.
//! - **Pagination** ([`Page`]) turns Link headers — or page/offset
//!   conventions on dialects that lack them — into one lazy bidirectional
//!   cursor abstraction.
//! - **Streaming** ([`StreamingChannel`]) demultiplexes the websocket
//!   stream into per-subscription listeners.
//!
//! Every request is async and cancellable by dropping its future; there is
//! no internal queue, retry, or cache.
//!
//! ```no_run
//! # async fn run() -> polyfed::Result<()> {
//! let mut client = polyfed::Client::new("https://mastodon.example")?;
//! client.fetch_instance().await?;
//! client.set_access_token(Some("token".into()));
//!
//! let page = client.home_timeline(&Default::default()).await?;
//! for status in &page.items {
//!     println!("{}: {}", status.account.acct, status.content);
//! }
//! if let Some(older) = page.next().await? {
//!     println!("{} more", older.items.len());
//! }
//! # Ok(()) }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

mod api;
mod channel;
mod client;
pub mod errors;
mod paginate;
mod transport;

pub mod prelude;

// --- PUBLIC API EXPORTS ---
// Client facade and configuration
pub use client::{Client, ClientBuilder};
// Endpoint parameter types
pub use api::{
    CreateAppParams, CreateStatusParams, NotificationParams, PollParams, SearchParams,
    TimelineParams, UpdateCredentialsParams, UploadMediaParams,
};
// Transport surface
pub use transport::{Envelope, FormField, FormValue, ProgressFn, Query, QueryValue, RequestBody};
// Pagination and streaming
pub use channel::{ChannelState, StreamingChannel};
pub use paginate::Page;

// Errors
pub use errors::{BuildError, Error, RequestError, Result};

// Re-exports
pub use polyfed_common::streaming::{ControlKind, ControlMessage, StreamingEvent};
pub use polyfed_common::{BackendIdentity, Entity, Features, entities};
pub use reqwest::{Method, StatusCode};
