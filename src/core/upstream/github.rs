//! GitHub REST provider.
//!
//! A token is optional: public repositories can be read anonymously, at a
//! much lower upstream quota.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use super::client::{HttpClient, join_url};
use crate::core::config::{GitHubConfig, UpstreamConfig};
use crate::core::error::Result;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client.
#[derive(Debug)]
pub struct GitHubClient {
    http: HttpClient,
    base_url: String,
    token: Option<String>,
}

fn github_error_detail(body: &Value) -> Option<String> {
    body.get("message").and_then(Value::as_str).map(str::to_string)
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig, upstream: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new("GitHub", upstream, github_error_detail)?,
            base_url: config.api_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Pick the credential source: token when configured, anonymous otherwise.
    pub async fn initialize(&self) -> Result<()> {
        if self.token.is_some() {
            info!("GitHub: token authentication initialized");
        } else {
            warn!("GitHub: no GITHUB_TOKEN set, using anonymous access (public repositories only)");
        }
        Ok(())
    }

    /// `GET` an endpoint relative to the API base with query parameters.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = join_url(&self.base_url, endpoint);
        let mut request = self
            .http
            .get(&url)
            .header("Accept", GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if !query.is_empty() {
            request = request.query(query);
        }

        self.http.send_json(request).await
    }
}
