//! The `google-auth` flow end to end: local callback, code exchange, token file.

mod helpers;

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    Form, Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use tempfile::TempDir;

use helpers::spawn_upstream;
use mcp_dev_workflow::core::{Config, Error};
use mcp_dev_workflow::setup::OAuthSetup;

async fn token_endpoint(Form(form): Form<HashMap<String, String>>) -> Response {
    let field = |name: &str| form.get(name).map(String::as_str);
    if field("grant_type") != Some("authorization_code") || field("code") != Some("abc") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant", "error_description": "Bad code"})),
        )
            .into_response();
    }
    Json(json!({
        "access_token": "ya29.fresh",
        "refresh_token": "1//refresh",
        "expires_in": 3599,
        "token_type": "Bearer"
    }))
    .into_response()
}

async fn setup(dir: &TempDir) -> OAuthSetup {
    let base = spawn_upstream(Router::new().route("/token", post(token_endpoint))).await;

    let mut config = Config::default();
    config.google.client_id = Some("client-id".to_string());
    config.google.client_secret = Some("client-secret".to_string());
    config.google.token_file = dir.path().join("google-token.json");
    config.google.token_url = format!("{base}/token");
    OAuthSetup::new(&config.google, &config.upstream, 0).unwrap()
}

fn ephemeral() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

#[tokio::test]
async fn test_authorization_code_is_stored() {
    let dir = tempfile::tempdir().unwrap();
    let setup = setup(&dir).await;
    assert!(setup.existing_token().is_none());

    let listener = setup.listen(ephemeral()).await.unwrap();
    let redirect = format!("http://{}/?code=abc", listener.local_addr());
    let response = reqwest::get(&redirect).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Authentication successful"));

    let path = listener.finish(&setup).await.unwrap();
    assert_eq!(path, dir.path().join("google-token.json"));

    let stored: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(stored["access_token"], "ya29.fresh");
    assert_eq!(stored["refresh_token"], "1//refresh");
    assert!(stored["expiry_date"].as_i64().unwrap() > 0);
    assert!(setup.existing_token().is_some());
}

#[tokio::test]
async fn test_denied_consent() {
    let dir = tempfile::tempdir().unwrap();
    let setup = setup(&dir).await;

    let listener = setup.listen(ephemeral()).await.unwrap();
    let redirect = format!("http://{}/?error=access_denied", listener.local_addr());
    let response = reqwest::get(&redirect).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert!(response.text().await.unwrap().contains("Authentication failed"));

    let err = listener.finish(&setup).await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
    assert!(err.to_string().contains("access_denied"));
    assert!(setup.existing_token().is_none());
}

#[tokio::test]
async fn test_rejected_code() {
    let dir = tempfile::tempdir().unwrap();
    let setup = setup(&dir).await;

    let listener = setup.listen(ephemeral()).await.unwrap();
    let redirect = format!("http://{}/?code=stale", listener.local_addr());
    reqwest::get(&redirect).await.unwrap();

    let err = listener.finish(&setup).await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
    assert!(err.to_string().contains("Bad code"));
}

#[tokio::test]
async fn test_missing_code_keeps_waiting() {
    let dir = tempfile::tempdir().unwrap();
    let setup = setup(&dir).await;

    let listener = setup.listen(ephemeral()).await.unwrap();
    let base = format!("http://{}", listener.local_addr());
    let response = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    reqwest::get(format!("{base}/?code=abc")).await.unwrap();
    assert!(listener.finish(&setup).await.is_ok());
}

#[tokio::test]
async fn test_error_parameter_is_not_reflected() {
    let dir = tempfile::tempdir().unwrap();
    let setup = setup(&dir).await;

    let listener = setup.listen(ephemeral()).await.unwrap();
    let response = reqwest::Client::new()
        .get(format!("http://{}/", listener.local_addr()))
        .query(&[("error", "<script>alert(1)</script>")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let page = response.text().await.unwrap();
    assert!(!page.contains("<script>"));
    assert!(!page.contains("alert(1)"));

    let err = listener.finish(&setup).await.unwrap_err();
    assert!(err.to_string().contains("<script>alert(1)</script>"));
}
