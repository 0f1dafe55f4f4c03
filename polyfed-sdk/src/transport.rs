//! Request transport.
//!
//! Resolves relative paths against the base URL, merges query parameters
//! (later values win, array values use bracket notation), chooses the body
//! encoding, attaches the bearer credential, and returns a uniform
//! [`Envelope`] for every response. Non-2xx responses raise
//! [`RequestError::Server`] carrying the whole envelope; this is the only
//! layer that raises.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use url::Url;

use crate::errors::{BuildError, Error, RequestError, Result};

const DEFAULT_USER_AGENT: &str = concat!("polyfed", "@", env!("CARGO_PKG_VERSION"));

/// Upload progress callback: `(bytes_sent, total_bytes)`.
pub type ProgressFn = Arc<dyn Fn(u64, Option<u64>) + Send + Sync>;

/// Uniform response envelope: status, headers, raw text, and the parsed
/// JSON body when the text is valid JSON.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers (pagination lives in `Link`).
    pub headers: HeaderMap,
    /// Raw body text.
    pub text: String,
    /// Parsed body, `None` when the text isn't JSON.
    pub json: Option<Value>,
}

impl Envelope {
    /// The parsed body, `Null` when absent.
    pub fn into_json(self) -> Value {
        self.json.unwrap_or(Value::Null)
    }

    /// Extract the human-readable error message. Dialects disagree on the
    /// key, so both spellings are checked.
    pub fn error_message(&self) -> Option<String> {
        let body = self.json.as_ref()?;
        for key in ["error", "error_description"] {
            if let Some(message) = body.get(key).and_then(Value::as_str) {
                return Some(message.to_string());
            }
        }
        None
    }

    /// Continuation URL for a Link-header relation (`next`/`prev`), taken
    /// verbatim from the response. `None` when no such relation exists.
    pub fn link(&self, rel: &str) -> Option<Url> {
        let header = self.headers.get(reqwest::header::LINK)?.to_str().ok()?;
        parse_link_header(header)
            .into_iter()
            .find(|(r, _)| r == rel)
            .map(|(_, url)| url)
    }
}

/// Parse an RFC-8288-style `Link` header into `(rel, url)` pairs.
pub(crate) fn parse_link_header(header: &str) -> Vec<(String, Url)> {
    let mut out = Vec::new();
    for part in header.split(',') {
        let part = part.trim();
        let Some(end) = part.find('>') else { continue };
        let Some(target) = part.strip_prefix('<').map(|rest| &rest[..end - 1]) else {
            continue;
        };
        let Ok(url) = Url::parse(target) else { continue };
        for param in part[end + 1..].split(';') {
            let param = param.trim();
            if let Some(rel) = param.strip_prefix("rel=") {
                out.push((rel.trim_matches('"').to_string(), url.clone()));
            }
        }
    }
    out
}

/// A single query parameter value. Array values serialize with bracket
/// notation: `key[]=a&key[]=b`.
#[derive(Debug, Clone)]
pub enum QueryValue {
    Single(String),
    Many(Vec<String>),
}

/// Ordered query parameter list.
#[derive(Debug, Clone, Default)]
pub struct Query(pub(crate) Vec<(String, QueryValue)>);

impl Query {
    pub fn new() -> Query {
        Query::default()
    }

    /// Append `key=value`.
    pub fn push(mut self, key: &str, value: impl ToString) -> Query {
        self.0.push((key.into(), QueryValue::Single(value.to_string())));
        self
    }

    /// Append `key=value` when the value is present.
    pub fn push_opt(mut self, key: &str, value: Option<impl ToString>) -> Query {
        if let Some(value) = value {
            self.0.push((key.into(), QueryValue::Single(value.to_string())));
        }
        self
    }

    /// Append an array value, serialized as `key[]=a&key[]=b`.
    pub fn push_array<I, S>(mut self, key: &str, values: I) -> Query
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.0.push((
            key.into(),
            QueryValue::Many(values.into_iter().map(|v| v.to_string()).collect()),
        ));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Request body.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// JSON-serialized object (the default encoding).
    Json(Value),
    /// Multipart form, used for uploads.
    Form(Vec<FormField>),
    /// Raw bytes, sent verbatim with an explicit content type.
    Raw(Vec<u8>),
}

/// One multipart form field.
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

/// Text or file content of a form field.
#[derive(Debug, Clone)]
pub enum FormValue {
    Text(String),
    File {
        filename: String,
        bytes: Vec<u8>,
        mime: Option<String>,
    },
}

/// Fully-described request, executed by [`Transport::send`].
#[derive(Default)]
pub(crate) struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Query,
    pub body: RequestBody,
    /// Body encoding override: `None` means JSON, `Some("")` forces
    /// multipart, anything else is passed through verbatim.
    pub content_type: Option<String>,
    /// Upload progress side channel. Forces the chunked-stream body path;
    /// the response envelope is identical either way.
    pub progress: Option<ProgressFn>,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str) -> ApiRequest {
        ApiRequest {
            method,
            path: path.to_string(),
            ..ApiRequest::default()
        }
    }

    pub fn query(mut self, query: Query) -> ApiRequest {
        self.query = query;
        self
    }

    pub fn json(mut self, body: Value) -> ApiRequest {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn form(mut self, fields: Vec<FormField>) -> ApiRequest {
        self.body = RequestBody::Form(fields);
        self.content_type = Some(String::new());
        self
    }

    pub fn progress(mut self, progress: Option<ProgressFn>) -> ApiRequest {
        self.progress = progress;
        self
    }
}

/// Stateless HTTP engine shared by the client facade and the paginated
/// fetcher. Cheap to clone.
#[derive(Clone, Debug)]
pub(crate) struct Transport {
    pub(crate) http: reqwest::Client,
    pub(crate) base: Url,
    pub(crate) token: Option<String>,
}

impl Transport {
    pub(crate) fn build(
        base_url: &str,
        timeout: Option<Duration>,
        user_agent_extra: Option<&str>,
    ) -> std::result::Result<Transport, BuildError> {
        let base = Url::parse(base_url)?;

        let user_agent = match user_agent_extra {
            Some(extra) if !extra.trim().is_empty() => {
                format!("{DEFAULT_USER_AGENT} {}", extra.trim())
            }
            _ => DEFAULT_USER_AGENT.to_string(),
        };

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Transport {
            http: builder.build()?,
            base,
            token: None,
        })
    }

    /// Resolve a possibly-relative path against the base URL and merge the
    /// explicit query parameters into any query already present on the
    /// path. Later values win.
    pub(crate) fn resolve(&self, path: &str, query: &Query) -> Result<Url> {
        let mut url = self.base.join(path)?;
        apply_query(&mut url, query);
        Ok(url)
    }

    /// Execute a request and shape the response into an [`Envelope`].
    ///
    /// Non-2xx statuses raise [`RequestError::Server`] with the envelope
    /// attached. Cancellation is by dropping the returned future.
    pub(crate) async fn send(&self, request: ApiRequest) -> Result<Envelope> {
        let url = self.resolve(&request.path, &request.query)?;
        tracing::debug!(method = %request.method, %url, "sending request");

        let mut builder = self.http.request(request.method.clone(), url);
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        builder = match (&request.content_type, request.body) {
            // Explicit empty content type forces multipart serialization.
            (Some(ct), RequestBody::Form(fields)) if ct.is_empty() => {
                builder.multipart(build_form(fields, request.progress.clone())?)
            }
            (Some(ct), body) => {
                let bytes = match body {
                    RequestBody::Raw(bytes) => bytes,
                    RequestBody::Json(value) => value.to_string().into_bytes(),
                    RequestBody::Form(_) | RequestBody::Empty => Vec::new(),
                };
                builder.header(CONTENT_TYPE, ct.as_str()).body(bytes)
            }
            // No override: JSON is the default encoding.
            (None, RequestBody::Json(value)) => builder.json(&value),
            (None, RequestBody::Form(fields)) => {
                builder.multipart(build_form(fields, request.progress.clone())?)
            }
            (None, RequestBody::Raw(bytes)) => builder.body(bytes),
            (None, RequestBody::Empty) => builder,
        };

        let response = builder.send().await.map_err(RequestError::Transport)?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await.map_err(RequestError::Transport)?;
        let json = serde_json::from_str(&text).ok();

        let envelope = Envelope {
            status,
            headers,
            text,
            json,
        };

        if !status.is_success() {
            return Err(Error::from(RequestError::Server {
                status,
                envelope: Box::new(envelope),
            }));
        }
        Ok(envelope)
    }
}

/// Merge explicit parameters into the URL's existing query string. An
/// explicit key replaces every pair the URL already carried under that key
/// (bracket spelling included).
fn apply_query(url: &mut Url, query: &Query) {
    if query.is_empty() {
        return;
    }

    let overridden: Vec<String> = query
        .0
        .iter()
        .flat_map(|(key, value)| match value {
            QueryValue::Single(_) => vec![key.clone()],
            QueryValue::Many(_) => vec![key.clone(), format!("{key}[]")],
        })
        .collect();

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !overridden.iter().any(|o| o == k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.set_query(None);
    let mut pairs = url.query_pairs_mut();
    for (k, v) in &kept {
        pairs.append_pair(k, v);
    }
    for (key, value) in &query.0 {
        match value {
            QueryValue::Single(v) => {
                pairs.append_pair(key, v);
            }
            QueryValue::Many(values) => {
                for v in values {
                    pairs.append_pair(&format!("{key}[]"), v);
                }
            }
        }
    }
    drop(pairs);

    if url.query() == Some("") {
        url.set_query(None);
    }
}

/// Assemble a multipart form. With a progress callback the file parts are
/// wrapped in a counting chunk stream; without one they are plain byte
/// parts. Both paths produce the same response envelope downstream.
fn build_form(
    fields: Vec<FormField>,
    progress: Option<ProgressFn>,
) -> Result<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();
    for field in fields {
        match field.value {
            FormValue::Text(text) => {
                form = form.text(field.name, text);
            }
            FormValue::File {
                filename,
                bytes,
                mime,
            } => {
                let part = match &progress {
                    Some(callback) => progress_part(&bytes, callback.clone()),
                    None => reqwest::multipart::Part::bytes(bytes),
                };
                let mut part = part.file_name(filename);
                if let Some(mime) = mime {
                    part = part.mime_str(&mime).map_err(|e| {
                        Error::from(RequestError::Validation {
                            message: format!("invalid MIME type {mime:?}: {e}"),
                        })
                    })?;
                }
                form = form.part(field.name, part);
            }
        }
    }
    Ok(form)
}

const UPLOAD_CHUNK: usize = 16 * 1024;

fn progress_part(bytes: &[u8], callback: ProgressFn) -> reqwest::multipart::Part {
    let total = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = bytes.chunks(UPLOAD_CHUNK).map(<[u8]>::to_vec).collect();
    let sent = Arc::new(AtomicU64::new(0));

    let stream = futures_util::stream::iter(chunks).map(move |chunk| {
        let so_far = sent.fetch_add(chunk.len() as u64, Ordering::Relaxed) + chunk.len() as u64;
        callback(so_far, Some(total));
        Ok::<_, std::io::Error>(chunk)
    });

    reqwest::multipart::Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> Transport {
        Transport::build("https://example.social", None, None).unwrap()
    }

    #[test]
    fn resolves_relative_paths() {
        let url = transport()
            .resolve("/api/v1/timelines/home", &Query::new())
            .unwrap();
        assert_eq!(url.as_str(), "https://example.social/api/v1/timelines/home");
    }

    #[test]
    fn later_query_values_win_over_path_query() {
        let query = Query::new().push("limit", 40).push("max_id", "9");
        let url = transport()
            .resolve("/api/v1/timelines/home?limit=20&local=true", &query)
            .unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("local".into(), "true".into()),
                ("limit".into(), "40".into()),
                ("max_id".into(), "9".into()),
            ]
        );
    }

    #[test]
    fn array_parameters_use_bracket_notation() {
        let query = Query::new().push_array("id", ["1", "2"]);
        let url = transport().resolve("/api/v1/accounts/relationships", &query).unwrap();
        assert_eq!(url.query(), Some("id%5B%5D=1&id%5B%5D=2"));
    }

    #[test]
    fn link_header_parsing() {
        let header = r#"<https://example.social/api/v1/timelines/home?max_id=1>; rel="next", <https://example.social/api/v1/timelines/home?min_id=9>; rel="prev""#;
        let links = parse_link_header(header);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].0, "next");
        assert!(links[0].1.as_str().contains("max_id=1"));
        assert_eq!(links[1].0, "prev");
    }

    #[test]
    fn malformed_link_header_yields_nothing() {
        assert!(parse_link_header("garbage").is_empty());
        assert!(parse_link_header("<not a url>; rel=\"next\"").is_empty());
    }
}
