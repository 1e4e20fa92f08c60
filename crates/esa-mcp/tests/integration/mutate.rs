//! Integration tests for `create_esa_post`, `update_esa_post` and
//! `delete_esa_post`.

use serde_json::{json, Value};

use crate::common::{
    payload_of, post, post_path, posts_path, text_of, ScriptedTransport, TestHarness,
};

fn keys(value: &Value) -> Vec<String> {
    value.as_object().unwrap().keys().cloned().collect()
}

#[tokio::test]
async fn test_create_defaults_wip_to_true() {
    let transport = ScriptedTransport::new().respond("POST", &posts_path(), 201, post(10));
    let harness = TestHarness::new(transport);

    harness
        .call("create_esa_post", json!({"name": "hello", "tags": ["a"]}))
        .await;

    let requests = harness.transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].body,
        Some(json!({"post": {"name": "hello", "tags": ["a"], "wip": true}}))
    );
}

#[tokio::test]
async fn test_create_returns_pinned_fields() {
    let transport = ScriptedTransport::new().respond("POST", &posts_path(), 201, post(10));
    let harness = TestHarness::new(transport);

    let payload = payload_of(
        &harness
            .call(
                "create_esa_post",
                json!({"name": "hello", "body_md": "# hi", "wip": false, "message": "init"}),
            )
            .await,
    );

    assert_eq!(
        keys(&payload),
        vec![
            "status",
            "success",
            "number",
            "full_name",
            "url",
            "wip",
            "created_at",
            "message",
            "kind",
            "tags",
            "category",
            "revision_number",
            "created_by",
        ]
    );
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["number"], json!(10));
    assert_eq!(
        harness.transport.requests()[0].body,
        Some(json!({"post": {"name": "hello", "body_md": "# hi", "wip": false, "message": "init"}}))
    );
}

#[tokio::test]
async fn test_create_requires_name() {
    let harness = TestHarness::new(ScriptedTransport::new());

    let result = harness.call("create_esa_post", json!({"body_md": "x"})).await;

    assert_eq!(result.is_error, Some(true));
    assert!(text_of(&result).contains("name: is required"));
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn test_update_sends_only_provided_fields() {
    let transport = ScriptedTransport::new().respond("PATCH", &post_path(4), 200, post(4));
    let harness = TestHarness::new(transport);

    let payload = payload_of(
        &harness
            .call("update_esa_post", json!({"postNumber": 4, "wip": false}))
            .await,
    );

    assert_eq!(
        harness.transport.requests()[0].body,
        Some(json!({"post": {"wip": false}}))
    );
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["updated_at"], json!("2024-01-03T03:04:05+09:00"));
    assert_eq!(payload["updated_by"]["screen_name"], json!("a"));
    assert!(payload.get("body_md").is_none());
    assert!(payload.get("comments_count").is_none());
}

#[tokio::test]
async fn test_update_honours_team_name() {
    let transport =
        ScriptedTransport::new().respond("PATCH", "/v1/teams/other/posts/4", 200, post(4));
    let harness = TestHarness::new(transport);

    let result = harness
        .call(
            "update_esa_post",
            json!({"teamName": "other", "postNumber": 4, "name": "renamed"}),
        )
        .await;

    assert_eq!(result.is_error, Some(false));
    assert_eq!(harness.transport.requests()[0].path(), "/v1/teams/other/posts/4");
}

#[tokio::test]
async fn test_delete_returns_success_literal() {
    let transport = ScriptedTransport::new().respond("DELETE", &post_path(4), 204, Value::Null);
    let harness = TestHarness::new(transport);

    let result = harness.call("delete_esa_post", json!({"postNumber": 4})).await;

    assert_eq!(result.is_error, Some(false));
    assert_eq!(text_of(&result).trim(), "success");
    let requests = harness.transport.requests();
    assert_eq!(requests[0].method.as_str(), "DELETE");
    assert!(requests[0].body.is_none());
}

#[tokio::test]
async fn test_delete_forbidden() {
    let transport = ScriptedTransport::new().respond(
        "DELETE",
        &post_path(4),
        403,
        json!({"error": "forbidden", "message": "Forbidden"}),
    );
    let harness = TestHarness::new(transport);

    let result = harness.call("delete_esa_post", json!({"postNumber": 4})).await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(text_of(&result), "Error: RemoteApiError: Forbidden");
}
