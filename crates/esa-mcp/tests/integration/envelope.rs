//! Integration tests for server-level envelopes and configuration.

use esa_client::EsaClient;
use esa_core::{StaticConfig, API_KEY, DEFAULT_TEAM};
use esa_mcp::{PostTools, ToolRegistry};
use serde_json::json;
use std::sync::Arc;

use crate::common::{post, post_path, text_of, ScriptedTransport, TestHarness};

#[tokio::test]
async fn test_every_tool_is_listed() {
    let harness = TestHarness::new(ScriptedTransport::new());
    let server = &harness.server;

    for name in [
        "search_esa_posts",
        "read_esa_post",
        "read_esa_multiple_posts",
        "create_esa_post",
        "update_esa_post",
        "delete_esa_post",
        "get_search_query_document",
    ] {
        let result = server.dispatch(name, json!(null)).await.unwrap();
        assert!(
            !text_of(&result).starts_with("Error: Unknown tool"),
            "{name} is not registered"
        );
    }
}

#[tokio::test]
async fn test_unknown_tool() {
    let harness = TestHarness::new(ScriptedTransport::new());

    let result = harness.call("read_esa_comment", json!({})).await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(text_of(&result), "Error: Unknown tool: read_esa_comment");
}

#[tokio::test]
async fn test_missing_api_key_fails_only_the_call() {
    let transport = ScriptedTransport::new().respond("GET", &post_path(1), 200, post(1));
    let config = StaticConfig::new().with(DEFAULT_TEAM, "docs");
    let harness = TestHarness::with_config(transport, config);

    let result = harness.call("read_esa_post", json!({"postNumber": 1})).await;
    assert_eq!(
        text_of(&result),
        "Error: ConfigurationError: Missing required environment: ESA_API_KEY"
    );
    assert!(harness.transport.requests().is_empty());

    // The guide needs no credential.
    let guide = harness.call("get_search_query_document", json!({})).await;
    assert_eq!(guide.is_error, Some(false));
}

#[test]
fn test_missing_default_team_fails_registration() {
    let config = StaticConfig::new().with(API_KEY, "token");
    let client = EsaClient::new(ScriptedTransport::new(), Arc::new(config.clone()));

    let err = PostTools::new(client, &config).err().unwrap();

    assert!(err.is_fatal());
    assert_eq!(err.kind(), "ConfigurationError");
    assert!(err.to_string().contains("DEFAULT_ESA_TEAM"));
}

#[test]
fn test_schema_advertises_defaults() {
    let config = crate::common::config();
    let client = EsaClient::new(ScriptedTransport::new(), Arc::new(config.clone()));
    let tools = PostTools::new(client, &config).unwrap();
    let search = tools
        .tools()
        .into_iter()
        .find(|t| t.name == "search_esa_posts")
        .unwrap();
    let properties = &search.input_schema["properties"];

    assert_eq!(properties["perPage"]["default"], json!(50));
    assert_eq!(properties["perPage"]["minimum"], json!(1));
    assert_eq!(properties["perPage"]["maximum"], json!(100));
    assert_eq!(properties["order"]["default"], json!("desc"));
    assert_eq!(properties["sort"]["default"], json!("best_match"));
    assert_eq!(properties["teamName"]["default"], json!("docs"));
    assert_eq!(search.input_schema["required"], json!(["query"]));
}
