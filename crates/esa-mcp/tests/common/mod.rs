//! Common test utilities and harness for esa-mcp integration tests.

use async_trait::async_trait;
use esa_client::{ApiRequest, ApiResponse, EsaClient, Transport};
use esa_core::{StaticConfig, API_KEY, DEFAULT_TEAM};
use esa_mcp::{CompositeRegistry, EsaMcpServer, GuideTools, PostTools};
use rmcp::model::{CallToolResult, RawContent};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Team configured as `DEFAULT_ESA_TEAM`.
pub const TEAM: &str = "docs";

/// Credential configured as `ESA_API_KEY`.
pub const TOKEN: &str = "test-token";

/// A transport that answers from a fixed script and records every request.
///
/// Unscripted requests get a 404 with an unstructured body.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, (ApiResponse, Duration)>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    /// Creates an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `method path` with `status` and `body`.
    pub fn respond(self, method: &str, path: &str, status: u16, body: Value) -> Self {
        self.respond_after(0, method, path, status, body)
    }

    /// Answers `method path` after `delay_ms` milliseconds.
    pub fn respond_after(
        mut self,
        delay_ms: u64,
        method: &str,
        path: &str,
        status: u16,
        body: Value,
    ) -> Self {
        self.responses.insert(
            format!("{method} {path}"),
            (
                ApiResponse::new(status, body),
                Duration::from_millis(delay_ms),
            ),
        );
        self
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> esa_core::Result<ApiResponse> {
        let key = format!("{} {}", request.method, request.path());
        self.requests.lock().unwrap().push(request);
        let (response, delay) = self
            .responses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| (ApiResponse::new(404, json!("Not Found")), Duration::ZERO));
        tokio::time::sleep(delay).await;
        Ok(response)
    }
}

/// Test harness wiring a scripted transport into the full tool server.
pub struct TestHarness {
    /// The scripted remote.
    pub transport: Arc<ScriptedTransport>,
    /// Server over post and guide tools.
    pub server: EsaMcpServer<CompositeRegistry>,
}

impl TestHarness {
    /// Creates a harness with both configuration keys set.
    pub fn new(transport: ScriptedTransport) -> Self {
        Self::with_config(transport, config())
    }

    /// Creates a harness with custom configuration.
    pub fn with_config(transport: ScriptedTransport, config: StaticConfig) -> Self {
        let transport = Arc::new(transport);
        let shared: Arc<dyn Transport> = Arc::clone(&transport) as Arc<dyn Transport>;
        let client = EsaClient::with_shared(shared, Arc::new(config.clone()));
        let posts = PostTools::new(client, &config).expect("post tools should register");
        let registry = CompositeRegistry::new().add(posts).add(GuideTools::new());
        Self {
            transport,
            server: EsaMcpServer::new(registry),
        }
    }

    /// Calls a tool and returns its envelope.
    pub async fn call(&self, name: &str, args: Value) -> CallToolResult {
        self.server
            .dispatch(name, args)
            .await
            .expect("tools never fail at the protocol level")
    }
}

/// Configuration with both required keys.
pub fn config() -> StaticConfig {
    StaticConfig::new()
        .with(API_KEY, TOKEN)
        .with(DEFAULT_TEAM, TEAM)
}

/// The single text entry of an envelope.
pub fn text_of(result: &CallToolResult) -> String {
    assert_eq!(result.content.len(), 1, "envelope carries one text entry");
    match &result.content[0].raw {
        RawContent::Text(t) => t.text.clone(),
        _ => panic!("Expected text content"),
    }
}

/// The YAML payload of a successful envelope.
pub fn payload_of(result: &CallToolResult) -> Value {
    assert_eq!(result.is_error, Some(false), "unexpected failure: {}", text_of(result));
    yaml_serde::from_str(&text_of(result)).expect("payload should be YAML")
}

/// A raw post as the remote returns it.
pub fn post(number: u64) -> Value {
    json!({
        "number": number,
        "name": format!("post {number}"),
        "full_name": format!("dev/post {number}"),
        "wip": false,
        "body_md": format!("# post {number}"),
        "body_html": format!("<h1>post {number}</h1>"),
        "created_at": "2024-01-02T03:04:05+09:00",
        "updated_at": "2024-01-03T03:04:05+09:00",
        "message": "update",
        "url": format!("https://docs.esa.io/posts/{number}"),
        "tags": ["api"],
        "category": "dev",
        "revision_number": 1,
        "created_by": {"name": "A", "screen_name": "a", "icon": null, "myself": true},
        "updated_by": {"name": "A", "screen_name": "a", "icon": null, "myself": true},
        "kind": "stock",
        "comments_count": 0,
        "stargazers_count": 2
    })
}

/// Path of a team's posts collection.
pub fn posts_path() -> String {
    format!("/v1/teams/{TEAM}/posts")
}

/// Path of one post.
pub fn post_path(number: u64) -> String {
    format!("/v1/teams/{TEAM}/posts/{number}")
}
