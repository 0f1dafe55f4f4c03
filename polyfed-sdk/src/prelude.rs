//! Convenient glob import for the common surface.
//!
//! ```
//! use polyfed::prelude::*;
//! ```

pub use crate::{
    BackendIdentity, Client, ClientBuilder, Error, Features, Page, Result, StreamingChannel,
    StreamingEvent,
};
pub use polyfed_common::entities::{
    Account, Instance, MediaAttachment, Notification, Status,
};
