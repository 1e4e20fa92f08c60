//! Integration tests for `read_esa_post` and `read_esa_multiple_posts`.

use serde_json::{json, Value};
use std::time::{Duration, Instant};

use crate::common::{payload_of, post, post_path, text_of, ScriptedTransport, TestHarness};

#[tokio::test]
async fn test_read_keeps_markdown_and_drops_html() {
    let transport = ScriptedTransport::new().respond("GET", &post_path(7), 200, post(7));
    let harness = TestHarness::new(transport);

    let payload = payload_of(&harness.call("read_esa_post", json!({"postNumber": 7})).await);

    assert_eq!(payload["status"], json!("success"));
    assert_eq!(payload["number"], json!(7));
    assert_eq!(payload["body_md"], json!("# post 7"));
    assert!(payload.get("body_html").is_none());
    assert_eq!(payload["created_by"]["screen_name"], json!("a"));
}

#[tokio::test]
async fn test_read_remote_message_is_reported() {
    let transport = ScriptedTransport::new().respond(
        "GET",
        &post_path(7),
        404,
        json!({"error": "not_found", "message": "Not found"}),
    );
    let harness = TestHarness::new(transport);

    let result = harness.call("read_esa_post", json!({"postNumber": 7})).await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(text_of(&result), "Error: RemoteApiError: Not found");
}

#[tokio::test]
async fn test_read_unstructured_failure_carries_status() {
    let transport =
        ScriptedTransport::new().respond("GET", &post_path(7), 502, json!("<html>Bad Gateway</html>"));
    let harness = TestHarness::new(transport);

    let result = harness.call("read_esa_post", json!({"postNumber": 7})).await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(text_of(&result), "Error: RemoteApiError: Api Error: 502");
}

#[tokio::test]
async fn test_read_rejects_non_positive_number() {
    let harness = TestHarness::new(ScriptedTransport::new());

    let result = harness.call("read_esa_post", json!({"postNumber": 0})).await;

    assert_eq!(result.is_error, Some(true));
    assert!(text_of(&result).contains("postNumber: must be at least 1"));
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn test_read_empty_record_is_not_found() {
    for body in [Value::Null, json!({})] {
        let transport = ScriptedTransport::new().respond("GET", &post_path(7), 200, body);
        let harness = TestHarness::new(transport);

        let result = harness.call("read_esa_post", json!({"postNumber": 7})).await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "Error: NotFoundError: post not found");
    }
}

#[tokio::test]
async fn test_read_returns_sparse_record_as_sent() {
    let transport = ScriptedTransport::new().respond(
        "GET",
        &post_path(7),
        200,
        json!({"number": 7, "body_md": "x", "body_html": "<p>x</p>", "tags": null}),
    );
    let harness = TestHarness::new(transport);

    let payload = payload_of(&harness.call("read_esa_post", json!({"postNumber": 7})).await);

    assert_eq!(
        payload,
        json!({"status": "success", "number": 7, "body_md": "x", "tags": null})
    );
}

#[tokio::test]
async fn test_read_multiple_preserves_input_order() {
    // Post 3 answers last, post 2 first.
    let transport = ScriptedTransport::new()
        .respond_after(150, "GET", &post_path(3), 200, post(3))
        .respond_after(100, "GET", &post_path(1), 200, post(1))
        .respond_after(50, "GET", &post_path(2), 200, post(2));
    let harness = TestHarness::new(transport);

    let started = Instant::now();
    let payload = payload_of(
        &harness
            .call("read_esa_multiple_posts", json!({"postNumbers": [3, 1, 2]}))
            .await,
    );
    let elapsed = started.elapsed();

    let numbers: Vec<u64> = payload
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["number"].as_u64().unwrap())
        .collect();
    assert_eq!(numbers, vec![3, 1, 2]);
    for post in payload.as_array().unwrap() {
        assert!(post.get("body_md").is_some());
        assert!(post.get("body_html").is_none());
    }

    // Fetches overlap rather than running back to back.
    assert!(elapsed < Duration::from_millis(250), "took {elapsed:?}");
}

#[tokio::test]
async fn test_read_multiple_fails_when_any_fetch_fails() {
    let transport = ScriptedTransport::new()
        .respond("GET", &post_path(1), 200, post(1))
        .respond("GET", &post_path(2), 403, json!({"message": "Forbidden"}));
    let harness = TestHarness::new(transport);

    let result = harness
        .call("read_esa_multiple_posts", json!({"postNumbers": [1, 2]}))
        .await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(text_of(&result), "Error: RemoteApiError: Forbidden");
}

#[tokio::test]
async fn test_read_multiple_empty_list() {
    let harness = TestHarness::new(ScriptedTransport::new());

    let payload = payload_of(
        &harness
            .call("read_esa_multiple_posts", json!({"postNumbers": []}))
            .await,
    );

    assert_eq!(payload, json!([]));
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn test_read_multiple_leaves_out_absent_records() {
    let transport = ScriptedTransport::new()
        .respond("GET", &post_path(1), 200, post(1))
        .respond("GET", &post_path(2), 200, Value::Null)
        .respond("GET", &post_path(3), 200, post(3));
    let harness = TestHarness::new(transport);

    let payload = payload_of(
        &harness
            .call("read_esa_multiple_posts", json!({"postNumbers": [3, 2, 1]}))
            .await,
    );

    let numbers: Vec<u64> = payload
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["number"].as_u64().unwrap())
        .collect();
    assert_eq!(numbers, vec![3, 1]);
}

#[tokio::test]
async fn test_read_multiple_rejects_non_positive_numbers() {
    let harness = TestHarness::new(ScriptedTransport::new());

    let result = harness
        .call("read_esa_multiple_posts", json!({"postNumbers": [1, 0]}))
        .await;

    assert_eq!(result.is_error, Some(true));
    assert!(text_of(&result).contains("postNumbers: item 1: must be at least 1"));
    assert!(harness.transport.requests().is_empty());
}
