//! Transport seam between the gateway and the network.
//!
//! [`EsaClient`](crate::EsaClient) speaks to the remote API only through the
//! [`Transport`] trait: one request in, one status and body out. Outcome
//! classification happens above this layer, so a transport never decides
//! whether a status is a failure.

use async_trait::async_trait;
use esa_core::{Error, Result};
use reqwest::{Method, Url};
use serde_json::Value;
use std::fmt;

/// Public esa.io API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.esa.io";

/// One outbound API call.
#[derive(Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Unencoded path segments, e.g. `["v1", "teams", "docs", "posts"]`.
    pub segments: Vec<String>,
    /// Query-string pairs.
    pub query: Vec<(&'static str, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
    /// Bearer credential for the `Authorization` header.
    pub bearer_token: String,
}

impl ApiRequest {
    /// Create a request with no query and no body.
    pub fn new<I, S>(method: Method, segments: I, bearer_token: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
            bearer_token: bearer_token.into(),
        }
    }

    /// Attach query-string pairs.
    #[must_use]
    pub fn with_query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Path as it would appear in a log line.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path())
            .field("query", &self.query)
            .field("body", &self.body)
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

/// Raw outcome of one API call.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded body: JSON when possible, a string otherwise, `null` when empty.
    pub body: Value,
}

impl ApiResponse {
    /// Create a response.
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// Sends API requests.
///
/// Implementations return `Err` only when no HTTP status was obtained.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// `reqwest`-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for the public esa.io endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a transport for another endpoint (proxies, test servers).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::transport_with_source(format!("invalid base URL '{base_url}'"), e))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::transport(format!(
                "invalid base URL '{base_url}': cannot carry a path"
            )));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the full URL for a request, percent-encoding each segment.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::transport("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(&request.segments);
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &request.query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request)?;
        let method = request.method.clone();
        log::debug!("{method} {}", request.path());

        let mut builder = self
            .client
            .request(method.clone(), url)
            .bearer_auth(&request.bearer_token);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            Error::transport_with_source(format!("{method} {} failed", request.path()), e)
        })?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| {
            Error::transport_with_source(
                format!("{method} {}: could not read response body", request.path()),
                e,
            )
        })?;

        log::debug!("{method} {} -> {status}", request.path());
        Ok(ApiResponse::new(status, decode_body(&bytes)))
    }
}

/// Decode a response body without ever failing.
pub(crate) fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

// ============================================================================
// Tests
// ============================================================================
