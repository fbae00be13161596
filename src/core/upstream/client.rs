//! Shared HTTP plumbing for the upstream providers.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::config::UpstreamConfig;
use crate::core::error::{Error, Result};

/// Reads the human-readable message out of an upstream error body.
pub type ErrorDetail = fn(&Value) -> Option<String>;

/// Longest raw (non-JSON) error body echoed back to the caller.
const MAX_RAW_ERROR_LEN: usize = 200;

/// A `reqwest` client bound to one upstream service.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    service: &'static str,
    error_detail: ErrorDetail,
}

impl HttpClient {
    /// Build a client with the configured timeout and user agent.
    pub fn new(
        service: &'static str,
        config: &UpstreamConfig,
        error_detail: ErrorDetail,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            service,
            error_detail,
        })
    }

    /// Name used in error messages ("Figma", "GitHub", ...).
    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Send a request and decode a 2xx JSON body into `T`.
    ///
    /// 401 responses become [`Error::Auth`]; any other non-2xx status becomes
    /// [`Error::Upstream`] carrying the status and the parsed body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        debug!("{} responded with {}", self.service, status);

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        Err(self.error_from_body(status, &text))
    }

    fn error_from_body(&self, status: StatusCode, text: &str) -> Error {
        let body: Option<Value> = serde_json::from_str(text).ok();
        let message = body
            .as_ref()
            .and_then(|b| (self.error_detail)(b))
            .unwrap_or_else(|| raw_message(status, text));

        warn!("{} API error {}: {}", self.service, status.as_u16(), message);

        if status == StatusCode::UNAUTHORIZED {
            return Error::auth(format!(
                "{} rejected the credentials ({}): {}",
                self.service,
                status.as_u16(),
                message
            ));
        }

        Error::Upstream {
            service: self.service,
            status: status.as_u16(),
            message,
            body,
        }
    }
}

fn raw_message(status: StatusCode, text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return status.canonical_reason().unwrap_or_default().to_string();
    }
    if text.chars().count() > MAX_RAW_ERROR_LEN {
        let truncated: String = text.chars().take(MAX_RAW_ERROR_LEN).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}

/// Join a base URL and an endpoint path; absolute endpoints pass through.
pub fn join_url(base: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;

    fn message_field(body: &Value) -> Option<String> {
        body.get("message").and_then(Value::as_str).map(str::to_string)
    }

    fn client() -> HttpClient {
        HttpClient::new("Test", &Config::default().upstream, message_field).unwrap()
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://api.figma.com/v1", "/files/abc"),
            "https://api.figma.com/v1/files/abc"
        );
        assert_eq!(
            join_url("https://api.github.com/", "repos/a/b"),
            "https://api.github.com/repos/a/b"
        );
        assert_eq!(
            join_url("https://api.figma.com/v1", "https://example.com/x"),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_error_from_json_body() {
        let err = client().error_from_body(StatusCode::NOT_FOUND, r#"{"message":"Not Found"}"#);
        match err {
            Error::Upstream {
                status,
                message,
                body,
                ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
                assert!(body.is_some());
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_from_raw_body() {
        let err = client().error_from_body(StatusCode::BAD_GATEWAY, "upstream exploded");
        assert_eq!(err.to_string(), "Test API error: 502 - upstream exploded");
    }

    #[test]
    fn test_error_from_empty_body_uses_reason() {
        let err = client().error_from_body(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.to_string(), "Test API error: 500 - Internal Server Error");
    }

    #[test]
    fn test_unauthorized_is_auth_error() {
        let err = client().error_from_body(StatusCode::UNAUTHORIZED, r#"{"message":"Bad credentials"}"#);
        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().contains("Bad credentials"));
    }
}
