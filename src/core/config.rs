//! Configuration management for the adapter servers.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (and a `.env` file), with defaults for everything
//! except credentials.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure shared by every adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Outbound HTTP behaviour.
    pub upstream: UpstreamConfig,

    /// Figma adapter settings.
    pub figma: FigmaConfig,

    /// GitHub adapter settings.
    pub github: GitHubConfig,

    /// Google Workspace adapter settings.
    pub google: GoogleConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name reported to clients; each adapter has its own default.
    pub name: Option<String>,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Shared settings for every outbound REST call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Upper bound on a single upstream request, connect to last byte.
    pub request_timeout: Duration,

    /// User agent sent upstream (GitHub rejects requests without one).
    pub user_agent: String,
}

/// Figma adapter configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct FigmaConfig {
    /// Personal access token, sent as `X-Figma-Token`.
    pub access_token: Option<String>,

    /// REST base URL.
    pub api_url: String,

    /// Requests admitted per minute.
    pub rate_limit: usize,
}

/// GitHub adapter configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Optional token; public repositories work without one.
    pub token: Option<String>,

    /// REST base URL.
    pub api_url: String,

    /// Requests admitted per minute.
    pub rate_limit: usize,
}

/// Google Workspace adapter configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Inline service-account key JSON.
    pub service_account_key: Option<String>,

    /// Path to a service-account key file.
    pub service_account_file: Option<PathBuf>,

    /// OAuth2 client id.
    pub client_id: Option<String>,

    /// OAuth2 client secret.
    pub client_secret: Option<String>,

    /// Stored OAuth2 token written by the `google-auth` command.
    pub token_file: PathBuf,

    /// Docs REST base URL.
    pub docs_api_url: String,

    /// Token endpoint used for OAuth2 code exchange and refresh.
    pub token_url: String,

    /// Requests admitted per minute.
    pub rate_limit: usize,
}

fn redact(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "[REDACTED]")
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for FigmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FigmaConfig")
            .field("access_token", &redact(&self.access_token))
            .field("api_url", &self.api_url)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &redact(&self.token))
            .field("api_url", &self.api_url)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("service_account_key", &redact(&self.service_account_key))
            .field("service_account_file", &self.service_account_file)
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("token_file", &self.token_file)
            .field("docs_api_url", &self.docs_api_url)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_GOOGLE_TOKEN_FILE: &str = ".google-token.json";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_url: "https://api.figma.com/v1".to_string(),
            // Figma allows 300 requests per minute
            rate_limit: 300,
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: "https://api.github.com".to_string(),
            rate_limit: 60,
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            service_account_key: None,
            service_account_file: None,
            client_id: None,
            client_secret: None,
            token_file: PathBuf::from(DEFAULT_GOOGLE_TOKEN_FILE),
            docs_api_url: "https://docs.googleapis.com/v1".to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            rate_limit: 100,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            upstream: UpstreamConfig {
                request_timeout: DEFAULT_REQUEST_TIMEOUT,
                user_agent: format!("mcp-dev-workflow/{}", env!("CARGO_PKG_VERSION")),
            },
            figma: FigmaConfig::default(),
            github: GitHubConfig::default(),
            google: GoogleConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the process environment (after reading `.env`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(name) = var("MCP_SERVER_NAME") {
            config.server.name = Some(name);
        }

        if let Some(level) = var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(secs) = parse_number::<u64>("MCP_REQUEST_TIMEOUT_SECS", var("MCP_REQUEST_TIMEOUT_SECS")) {
            config.upstream.request_timeout = Duration::from_secs(secs);
        }

        // Figma
        config.figma.access_token = var("FIGMA_ACCESS_TOKEN");
        if let Some(url) = var("FIGMA_API_URL") {
            config.figma.api_url = url;
        }
        if let Some(limit) = parse_number("FIGMA_RATE_LIMIT", var("FIGMA_RATE_LIMIT")) {
            config.figma.rate_limit = limit;
        }

        // GitHub
        config.github.token = var("GITHUB_TOKEN");
        if let Some(url) = var("GITHUB_API_URL") {
            config.github.api_url = url;
        }
        if let Some(limit) = parse_number("GITHUB_RATE_LIMIT", var("GITHUB_RATE_LIMIT")) {
            config.github.rate_limit = limit;
        }

        // Google Workspace
        config.google.service_account_key = var("GOOGLE_SERVICE_ACCOUNT_KEY");
        config.google.service_account_file = var("GOOGLE_SERVICE_ACCOUNT_FILE").map(PathBuf::from);
        config.google.client_id = var("GOOGLE_CLIENT_ID");
        config.google.client_secret = var("GOOGLE_CLIENT_SECRET");
        if let Some(path) = var("GOOGLE_TOKEN_FILE") {
            config.google.token_file = PathBuf::from(path);
        }
        if let Some(url) = var("GOOGLE_DOCS_API_URL") {
            config.google.docs_api_url = url;
        }
        if let Some(limit) = parse_number("GOOGLE_RATE_LIMIT", var("GOOGLE_RATE_LIMIT")) {
            config.google.rate_limit = limit;
        }

        config
    }

    /// Log which credentials are present, without their values.
    pub fn log_summary(&self) {
        info!(
            "Upstream request timeout: {}s",
            self.upstream.request_timeout.as_secs()
        );
        if self.figma.access_token.is_some() {
            info!("Figma access token loaded from environment");
        }
        if self.github.token.is_none() {
            warn!("GITHUB_TOKEN not set - GitHub requests are anonymous and heavily rate limited");
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: Option<String>) -> Option<T> {
    let value = value?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring invalid value for {}: {:?}", key, value);
            None
        }
    }
}
