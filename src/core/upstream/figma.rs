//! Figma REST provider.
//!
//! Authenticates with a personal access token sent as `X-Figma-Token`.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{info, instrument};

use super::client::{HttpClient, join_url};
use crate::core::config::{FigmaConfig, UpstreamConfig};
use crate::core::error::{Error, Result};

/// The authenticated user, as returned by `GET /me`.
#[derive(Debug, Clone, Deserialize)]
pub struct FigmaUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
}

/// Figma API client holding the access token.
#[derive(Debug)]
pub struct FigmaClient {
    http: HttpClient,
    base_url: String,
    token: Option<String>,
    user: OnceCell<FigmaUser>,
}

fn figma_error_detail(body: &Value) -> Option<String> {
    body.get("err")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

impl FigmaClient {
    pub fn new(config: &FigmaConfig, upstream: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new("Figma", upstream, figma_error_detail)?,
            base_url: config.api_url.clone(),
            token: config.access_token.clone(),
            user: OnceCell::new(),
        })
    }

    /// Verify the token against `GET /me`.
    ///
    /// Repeated or concurrent calls share the first successful result.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<()> {
        let user = self
            .user
            .get_or_try_init(|| async {
                if self.token.is_none() {
                    return Err(Error::auth(
                        "No Figma access token found. Please set FIGMA_ACCESS_TOKEN environment variable. \
                         Get your token at: https://www.figma.com/developers/api#access-tokens",
                    ));
                }

                let user: FigmaUser = self
                    .send("/me", &[])
                    .await
                    .map_err(|e| Error::auth(format!("Figma authentication failed: {e}")))?;

                if user.id.is_none() {
                    return Err(Error::auth(
                        "Figma authentication failed: invalid response from Figma API",
                    ));
                }
                Ok(user)
            })
            .await?;

        info!(
            "Figma authentication initialized for {}",
            user.handle.as_deref().unwrap_or("unknown user")
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.user.initialized()
    }

    /// `GET` an endpoint relative to the API base and decode the JSON body.
    pub async fn request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.request_with_query(endpoint, &[]).await
    }

    pub async fn request_with_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        if !self.is_initialized() {
            return Err(Error::auth("Figma authentication not initialized"));
        }
        self.send(endpoint, query).await
    }

    async fn send<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<T> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| Error::auth("Figma access token missing"))?;

        let url = join_url(&self.base_url, endpoint);
        let mut request = self
            .http
            .get(&url)
            .header("X-Figma-Token", token)
            .header("Content-Type", "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        self.http.send_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;

    #[tokio::test]
    async fn test_initialize_without_token_is_auth_error() {
        let config = Config::default();
        let client = FigmaClient::new(&config.figma, &config.upstream).unwrap();
        let err = client.initialize().await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().contains("FIGMA_ACCESS_TOKEN"));
        assert!(!client.is_initialized());
    }

    #[tokio::test]
    async fn test_request_before_initialize_fails() {
        let mut config = Config::default();
        config.figma.access_token = Some("token".to_string());
        let client = FigmaClient::new(&config.figma, &config.upstream).unwrap();
        let err = client.request::<Value>("/files/abc").await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[test]
    fn test_error_detail_prefers_err_field() {
        let body = serde_json::json!({"status": 404, "err": "Not found"});
        assert_eq!(figma_error_detail(&body).as_deref(), Some("Not found"));
        let body = serde_json::json!({"message": "Invalid token"});
        assert_eq!(figma_error_detail(&body).as_deref(), Some("Invalid token"));
    }
}
