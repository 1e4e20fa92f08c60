//! esa.io API gateway.
//!
//! [`EsaClient`] performs one typed remote operation per method, attaches the
//! bearer credential, and classifies the outcome through [`classify`]. Callers
//! only ever see success values or an [`esa_core::Error`]; they never branch
//! on HTTP status themselves.

use crate::model::{Post, PostInput, PostList, PostPatch, SearchParams};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
use esa_core::{ConfigSource, Error, Result, API_KEY};
use futures::stream::{FuturesUnordered, TryStreamExt};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

/// Classify a raw response.
///
/// 200, 201 and 204 are success and yield the body. Anything else fails with
/// the body's string `message` field when present, or `Api Error: <status>`.
pub fn classify(response: ApiResponse) -> Result<Value> {
    match response.status {
        200 | 201 | 204 => Ok(response.body),
        status => {
            let message = response
                .body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Api Error: {status}"));
            Err(Error::remote_api(status, message))
        }
    }
}

/// Gateway to the esa.io posts API.
#[derive(Clone)]
pub struct EsaClient {
    transport: Arc<dyn Transport>,
    config: Arc<dyn ConfigSource>,
}

impl EsaClient {
    /// Create a client over any transport.
    ///
    /// The credential is read from `config` under [`API_KEY`] on every call,
    /// so a missing key fails the call rather than construction.
    pub fn new<T: Transport + 'static>(transport: T, config: Arc<dyn ConfigSource>) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
        }
    }

    /// Create a client with a shared transport reference.
    pub fn with_shared(transport: Arc<dyn Transport>, config: Arc<dyn ConfigSource>) -> Self {
        Self { transport, config }
    }

    /// Create a client talking HTTP to `base_url`.
    pub fn http(base_url: &str, config: Arc<dyn ConfigSource>) -> Result<Self> {
        Ok(Self::new(HttpTransport::with_base_url(base_url)?, config))
    }

    /// Search posts in `team`.
    pub async fn search_posts(&self, team: &str, params: &SearchParams) -> Result<Vec<Post>> {
        let request = ApiRequest::new(Method::GET, posts_path(team), self.token()?)
            .with_query(params.to_query());
        let list: PostList = self.call_json(request).await?;
        Ok(list.posts)
    }

    /// Read one post.
    ///
    /// A success with a `null` or empty-object body means the record is
    /// absent and yields `None`.
    pub async fn read_post(&self, team: &str, number: u64) -> Result<Option<Post>> {
        let request = ApiRequest::new(Method::GET, post_path(team, number), self.token()?);
        let body = self.call(request).await?;
        if body.is_null() || body.as_object().is_some_and(|fields| fields.is_empty()) {
            log::debug!("post {number} in {team} came back empty");
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(body)?))
    }

    /// Read several posts concurrently.
    ///
    /// Results come back in the order of `numbers`, whatever order the
    /// fetches complete in. Absent records are left out. The first failure
    /// fails the whole read.
    pub async fn read_posts(&self, team: &str, numbers: &[u64]) -> Result<Vec<Post>> {
        let pending: FuturesUnordered<_> = numbers
            .iter()
            .enumerate()
            .map(|(index, &number)| async move {
                let post = self.read_post(team, number).await?;
                Ok::<_, Error>((index, post))
            })
            .collect();

        let mut slots: Vec<Option<Post>> = vec![None; numbers.len()];
        let completed: Vec<(usize, Option<Post>)> = pending.try_collect().await?;
        for (index, post) in completed {
            slots[index] = post;
        }
        Ok(slots.into_iter().flatten().collect())
    }

    /// Create a post.
    pub async fn create_post(&self, team: &str, post: &PostInput) -> Result<Post> {
        let request = ApiRequest::new(Method::POST, posts_path(team), self.token()?)
            .with_body(json!({ "post": post }));
        self.call_json(request).await
    }

    /// Update a post, sending only the fields set in `patch`.
    pub async fn update_post(&self, team: &str, number: u64, patch: &PostPatch) -> Result<Post> {
        let request = ApiRequest::new(Method::PATCH, post_path(team, number), self.token()?)
            .with_body(json!({ "post": patch }));
        self.call_json(request).await
    }

    /// Delete a post.
    pub async fn delete_post(&self, team: &str, number: u64) -> Result<()> {
        let request = ApiRequest::new(Method::DELETE, post_path(team, number), self.token()?);
        self.call(request).await.map(|_| ())
    }

    fn token(&self) -> Result<String> {
        self.config.get_required(API_KEY)
    }

    async fn call(&self, request: ApiRequest) -> Result<Value> {
        let label = format!("{} {}", request.method, request.path());
        let response = self.transport.send(request).await?;
        classify(response).inspect_err(|e| log::debug!("{label} failed: {e}"))
    }

    async fn call_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let body = self.call(request).await?;
        Ok(serde_json::from_value(body)?)
    }
}

fn posts_path(team: &str) -> Vec<String> {
    vec![
        "v1".to_string(),
        "teams".to_string(),
        team.to_string(),
        "posts".to_string(),
    ]
}

fn post_path(team: &str, number: u64) -> Vec<String> {
    let mut path = posts_path(team);
    path.push(number.to_string());
    path
}

// ============================================================================
// Tests
// ============================================================================
