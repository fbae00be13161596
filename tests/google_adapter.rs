//! Google Workspace adapter against an in-process mock of the Docs API and
//! the OAuth2 token endpoint.

mod helpers;

use std::collections::HashMap;
use std::path::Path as FsPath;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use serde_json::{Value, json};
use tempfile::TempDir;

use helpers::{args, error_text, spawn_upstream, success_text};
use mcp_dev_workflow::core::upstream::{CredentialSource, GoogleDocsClient};
use mcp_dev_workflow::core::{Adapter, Config, Error};
use mcp_dev_workflow::domains::tools::ToolRegistry;

const DOC_ID: &str = "1AbCdEfGhIjKlMnOpQrStUvWxYz_0123456789";
const VALID_TOKENS: &[&str] = &["Bearer ya29.valid", "Bearer ya29.refreshed", "Bearer ya29.service"];

const SERVICE_ACCOUNT_EMAIL: &str = "docs-reader@acme-dev.iam.gserviceaccount.com";
const SERVICE_ACCOUNT_KEY: &str = include_str!("fixtures/service_account_key.pem");
const SERVICE_ACCOUNT_PUBLIC_KEY: &str = include_str!("fixtures/service_account_pub.pem");
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

fn document() -> Value {
    json!({
        "documentId": DOC_ID,
        "title": "Launch plan",
        "revisionId": "rev-7",
        "documentStyle": {
            "pageSize": {"width": {"magnitude": 612, "unit": "PT"}, "height": {"magnitude": 792, "unit": "PT"}},
            "marginTop": {"magnitude": 72, "unit": "PT"},
            "marginBottom": {"magnitude": 72, "unit": "PT"}
        },
        "body": {"content": [
            {"paragraph": {
                "paragraphStyle": {"namedStyleType": "HEADING_1"},
                "elements": [{"textRun": {"content": "Overview\n"}}]
            }},
            {"paragraph": {"elements": [
                {"textRun": {"content": "Ship the "}},
                {"textRun": {"content": "beta", "textStyle": {"bold": true}}},
                {"textRun": {"content": " on Friday.\n"}}
            ]}},
            {"paragraph": {"elements": [{"textRun": {"content": "Beta feedback goes to QA.\n"}}]}}
        ]}
    })
}

async fn get_document(
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
    if !auth.is_some_and(|a| VALID_TOKENS.contains(&a)) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"code": 401, "message": "Request had invalid authentication credentials."}})),
        )
            .into_response();
    }
    if id != DOC_ID {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"code": 404, "message": "Requested entity was not found."}})),
        )
            .into_response();
    }

    let mut doc = document();
    if query.contains_key("fields") {
        if let Some(fields) = doc.as_object_mut() {
            fields.remove("body");
        }
    }
    Json(doc).into_response()
}

async fn token_endpoint(Form(form): Form<HashMap<String, String>>) -> Response {
    if form.get("grant_type").map(String::as_str) != Some("refresh_token")
        || form.get("refresh_token").map(String::as_str) != Some("refresh-1")
    {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_grant"}))).into_response();
    }
    Json(json!({"access_token": "ya29.refreshed", "expires_in": 3600, "token_type": "Bearer"}))
        .into_response()
}

fn write_token(dir: &FsPath, token: Value) -> std::path::PathBuf {
    let path = dir.join("google-token.json");
    std::fs::write(&path, token.to_string()).unwrap();
    path
}

async fn config_with_token(dir: &TempDir, token: Value) -> Config {
    let app = Router::new()
        .route("/documents/{id}", get(get_document))
        .route("/token", post(token_endpoint));
    let base = spawn_upstream(app).await;

    let mut config = Config::default();
    config.google.client_id = Some("client-id".to_string());
    config.google.client_secret = Some("client-secret".to_string());
    config.google.token_file = write_token(dir.path(), token);
    config.google.docs_api_url = base.clone();
    config.google.token_url = format!("{base}/token");
    config
}

async fn registry() -> (TempDir, ToolRegistry) {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_token(&dir, json!({"access_token": "ya29.valid"})).await;
    let registry = Adapter::GoogleWorkspace.build_registry(&config).await.unwrap();
    (dir, registry)
}

#[tokio::test]
async fn test_get_document_from_url() {
    let (_dir, registry) = registry().await;
    let result = registry
        .call_tool(
            "get_google_doc",
            args(json!({
                "document_id": format!("https://docs.google.com/document/d/{DOC_ID}/edit"),
                "format": "markdown"
            })),
        )
        .await;
    let body = success_text(&result);
    assert!(body.starts_with(&format!("# Launch plan\n\n**Document ID:** {DOC_ID}\n**Revision:** rev-7\n")));
    assert!(body.contains("## Content\n\n# Overview\n\nShip the **beta** on Friday."));
}

#[tokio::test]
async fn test_metadata_requests_fields() {
    let (_dir, registry) = registry().await;
    let result = registry
        .call_tool("get_google_doc_metadata", args(json!({"document_id": DOC_ID})))
        .await;
    let body = success_text(&result);
    assert!(body.starts_with("# Document Metadata\n\n**Title:** Launch plan\n"));
    assert!(body.contains("- **Page Size:** 612 x 792 PT\n- **Margins:** Top: 72, Bottom: 72"));
}

#[tokio::test]
async fn test_search_document() {
    let (_dir, registry) = registry().await;
    let result = registry
        .call_tool(
            "search_google_doc",
            args(json!({"document_id": DOC_ID, "search_text": "BETA", "context_lines": 0})),
        )
        .await;
    let body = success_text(&result);
    assert!(body.contains("**Matches Found:** 2"));
    assert!(body.contains("## Match 1 (Line 3)\n\n```\nShip the beta on Friday.\n```"));
    assert!(body.contains("**Matching line:** Beta feedback goes to QA."));

    let result = registry
        .call_tool(
            "search_google_doc",
            args(json!({"document_id": DOC_ID, "search_text": "budget"})),
        )
        .await;
    assert!(success_text(&result).ends_with("No matches found for \"budget\"."));
}

#[tokio::test]
async fn test_missing_document_is_error_text() {
    let (_dir, registry) = registry().await;
    let missing = "0".repeat(30);
    let result = registry
        .call_tool("get_google_doc", args(json!({"document_id": missing})))
        .await;
    let body = error_text(&result);
    assert!(body.starts_with("Error in get_google_doc: Google Docs API error: 404"));
    assert!(body.contains("Requested entity was not found."));
}

#[tokio::test]
async fn test_unrecognized_document_id() {
    let (_dir, registry) = registry().await;
    let result = registry
        .call_tool("get_google_doc", args(json!({"document_id": "short"})))
        .await;
    assert!(error_text(&result).contains("Could not extract document ID from: short"));
}

#[tokio::test]
async fn test_expired_token_is_refreshed() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_token(
        &dir,
        json!({"access_token": "ya29.stale", "refresh_token": "refresh-1", "expiry_date": 1000}),
    )
    .await;
    let registry = Adapter::GoogleWorkspace.build_registry(&config).await.unwrap();

    let result = registry
        .call_tool("get_google_doc_metadata", args(json!({"document_id": DOC_ID})))
        .await;
    assert!(success_text(&result).contains("**Revision ID:** rev-7"));
}

#[tokio::test]
async fn test_missing_token_file_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.google.client_id = Some("client-id".to_string());
    config.google.client_secret = Some("client-secret".to_string());
    config.google.token_file = dir.path().join("absent.json");

    let err = Adapter::GoogleWorkspace.build_registry(&config).await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
    assert!(err.to_string().contains("No valid Google authentication found"));
}

// Service account grant

#[derive(Debug, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    exp: u64,
}

struct TokenEndpoint {
    hits: AtomicUsize,
    expires_in: u64,
}

async fn jwt_token_endpoint(
    State(endpoint): State<Arc<TokenEndpoint>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    endpoint.hits.fetch_add(1, Ordering::SeqCst);
    let reject = |reason: &str| {
        (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_grant", "error_description": reason})))
            .into_response()
    };

    if form.get("grant_type").map(String::as_str) != Some(JWT_BEARER_GRANT) {
        return reject("unsupported grant type");
    }
    let Some(assertion) = form.get("assertion") else {
        return reject("missing assertion");
    };
    let host = headers
        .get("host")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[format!("http://{host}/token")]);
    validation.set_issuer(&[SERVICE_ACCOUNT_EMAIL]);
    let key = DecodingKey::from_rsa_pem(SERVICE_ACCOUNT_PUBLIC_KEY.as_bytes()).unwrap();
    let claims = match decode::<AssertionClaims>(assertion, &key, &validation) {
        Ok(data) => data.claims,
        Err(e) => return reject(&e.to_string()),
    };
    if claims.iss != SERVICE_ACCOUNT_EMAIL
        || !claims.aud.ends_with("/token")
        || !claims.scope.contains("documents.readonly")
        || claims.exp - claims.iat != 3600
    {
        return reject("bad claims");
    }

    Json(json!({"access_token": "ya29.service", "expires_in": endpoint.expires_in, "token_type": "Bearer"}))
        .into_response()
}

async fn service_account_config(expires_in: u64) -> (Config, Arc<TokenEndpoint>) {
    let endpoint = Arc::new(TokenEndpoint {
        hits: AtomicUsize::new(0),
        expires_in,
    });
    let app = Router::new()
        .route("/documents/{id}", get(get_document))
        .route("/token", post(jwt_token_endpoint))
        .with_state(endpoint.clone());
    let base = spawn_upstream(app).await;

    let key = json!({
        "type": "service_account",
        "client_email": SERVICE_ACCOUNT_EMAIL,
        "private_key": SERVICE_ACCOUNT_KEY,
        "token_uri": format!("{base}/token"),
    });
    let mut config = Config::default();
    config.google.service_account_key = Some(key.to_string());
    config.google.docs_api_url = base;
    (config, endpoint)
}

async fn fetch_metadata(registry: &ToolRegistry) -> String {
    let result = registry
        .call_tool("get_google_doc_metadata", args(json!({"document_id": DOC_ID})))
        .await;
    success_text(&result)
}

#[tokio::test]
async fn test_service_account_token_is_cached() {
    let (config, endpoint) = service_account_config(3600).await;
    let registry = Adapter::GoogleWorkspace.build_registry(&config).await.unwrap();
    assert_eq!(endpoint.hits.load(Ordering::SeqCst), 0);

    assert!(fetch_metadata(&registry).await.contains("**Title:** Launch plan"));
    assert!(fetch_metadata(&registry).await.contains("**Title:** Launch plan"));
    assert_eq!(endpoint.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_service_account_token_near_expiry_is_renewed() {
    // 30 s of validity is inside the renewal margin.
    let (config, endpoint) = service_account_config(30).await;
    let registry = Adapter::GoogleWorkspace.build_registry(&config).await.unwrap();

    fetch_metadata(&registry).await;
    fetch_metadata(&registry).await;
    assert_eq!(endpoint.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_service_account_wins_over_oauth() {
    let (mut config, _endpoint) = service_account_config(3600).await;
    config.google.client_id = Some("client-id".to_string());
    config.google.client_secret = Some("client-secret".to_string());

    let client = GoogleDocsClient::new(&config.google, &config.upstream).unwrap();
    assert_eq!(client.initialize().await.unwrap(), CredentialSource::ServiceAccount);
}

#[tokio::test]
async fn test_concurrent_initialize_resolves_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_token(&dir, json!({"access_token": "ya29.valid"})).await;
    let client = GoogleDocsClient::new(&config.google, &config.upstream).unwrap();

    let (first, second) = tokio::join!(client.initialize(), client.initialize());
    assert_eq!(first.unwrap(), CredentialSource::OAuth2);
    assert_eq!(second.unwrap(), CredentialSource::OAuth2);

    // Resolved credentials are kept; the token file is not read again.
    std::fs::remove_file(&config.google.token_file).unwrap();
    assert_eq!(client.initialize().await.unwrap(), CredentialSource::OAuth2);
}
