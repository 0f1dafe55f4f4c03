//! Endpoint surface of the [`crate::Client`], one module per API area.
//!
//! Every method validates its response through the canonical entity
//! validators and gates dialect-specific requests on the capability
//! matrix.

mod accounts;
mod admin;
mod announcements;
mod apps;
mod chats;
mod conversations;
mod instance;
mod interaction_requests;
mod lists;
mod markers;
mod media;
mod notifications;
mod polls;
mod reports;
mod scheduled;
mod search;
mod statuses;
mod streaming;
mod timelines;
mod trends;

pub use accounts::UpdateCredentialsParams;
pub use apps::CreateAppParams;
pub use media::UploadMediaParams;
pub use notifications::NotificationParams;
pub use search::SearchParams;
pub use statuses::{CreateStatusParams, PollParams};
pub use timelines::TimelineParams;
