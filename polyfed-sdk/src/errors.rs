//! Unified error types for the `polyfed` crate.
//!
//! All failures surface through the single top-level [`Error`] enum plus
//! the [`Result`] alias. Transport failures (network errors, non-2xx
//! statuses, malformed response bodies) are the only errors that
//! propagate; shape failures inside otherwise-successful responses are
//! handled field by field in `polyfed-common` and never raise.

use thiserror::Error;

use crate::transport::Envelope;

// --- Build-Time Error ---

/// Errors that can occur while building a [`crate::Client`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// Failed to build the HTTP client (reqwest configuration).
    #[error("Failed to build the HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    /// The base URL is not a valid absolute URL.
    #[error("Invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

// --- The Main Operational Error Enum ---

/// The crate's top-level error type.
///
/// - [`Error::Request`] — HTTP transport/server/validation issues
/// - [`Error::Parse`] — URL parsing failures
/// - [`Error::Build`] — construction of the client failed
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request/response failed (transport, server, JSON).
    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    /// URL parsing failed while preparing a request.
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] url::ParseError),

    /// Building the client failed.
    #[error("Client build failed: {0}")]
    Build(#[from] BuildError),
}

// --- Consolidated Request Error ---

/// Transport and server-side HTTP errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Network/protocol failure from reqwest (timeouts, TLS, I/O, etc.).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server returned a non-success status. Carries the full response
    /// envelope so callers can inspect dialect-specific error bodies.
    #[error("Server responded with an error: {status} - {}", .envelope.error_message().unwrap_or_else(|| "no error body".into()))]
    Server {
        /// The HTTP status code returned by the server.
        status: reqwest::StatusCode,
        /// Status, headers, raw text, and parsed JSON of the response.
        envelope: Box<Envelope>,
    },

    /// Caller supplied an invalid argument, or the capability matrix
    /// forbids the operation on this backend.
    #[error("Invalid request: {message}")]
    Validation {
        /// Human-readable explanation of what was invalid.
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("JSON decode error: {message}")]
    DecodeJson {
        /// Error message from the JSON deserializer (with context if available).
        message: String,
    },
}

/// A specialized `Result` type for `polyfed` operations.
pub type Result<T> = std::result::Result<T, Error>;

// Ergonomic "Staircase" From Implementations ---
// A macro to reduce boilerplate for converting base errors into the top-level Error.
macro_rules! impl_from_for_error {
    ($from_type:ty, $to_variant:path) => {
        impl From<$from_type> for Error {
            fn from(err: $from_type) -> Self {
                $to_variant(err.into())
            }
        }
    };
}

impl_from_for_error!(reqwest::Error, Error::Request);
