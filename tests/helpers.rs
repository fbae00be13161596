//! Shared helpers for the integration tests.
#![allow(dead_code)]

use axum::Router;
use rmcp::model::{CallToolResult, JsonObject, RawContent};
use serde_json::Value;
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral loopback port and return its base URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn args(value: Value) -> JsonObject {
    value.as_object().cloned().unwrap_or_default()
}

/// Text of the single content item of a tool result.
pub fn text(result: &CallToolResult) -> String {
    assert_eq!(result.content.len(), 1, "expected exactly one content item");
    match &result.content[0].raw {
        RawContent::Text(t) => t.text.clone(),
        other => panic!("expected text content, got {other:?}"),
    }
}

pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error == Some(true)
}

/// Text of a successful result; panics with the error text otherwise.
pub fn success_text(result: &CallToolResult) -> String {
    let body = text(result);
    assert!(!is_error(result), "tool failed: {body}");
    body
}

/// Text of a failed result; panics if the call succeeded.
pub fn error_text(result: &CallToolResult) -> String {
    let body = text(result);
    assert!(is_error(result), "tool unexpectedly succeeded: {body}");
    body
}
