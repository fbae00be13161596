//! Google Docs REST provider.
//!
//! Credentials are picked at initialization, first success wins:
//!
//! 1. inline service-account key JSON (`GOOGLE_SERVICE_ACCOUNT_KEY`)
//! 2. service-account key file (`GOOGLE_SERVICE_ACCOUNT_FILE`)
//! 3. OAuth2 client plus a token file written by `mcp-dev-workflow google-auth`
//!
//! Access tokens are cached for the process lifetime and refreshed shortly
//! before they expire.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info, instrument, warn};

use super::client::{HttpClient, join_url};
use crate::core::config::{GoogleConfig, UpstreamConfig};
use crate::core::error::{Error, Result};

/// Read-only scopes requested by every credential source.
pub const GOOGLE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/documents.readonly",
    "https://www.googleapis.com/auth/drive.readonly",
    "https://www.googleapis.com/auth/spreadsheets.readonly",
    "https://www.googleapis.com/auth/gmail.readonly",
];

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Redirect URI registered for the local OAuth callback.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080";

/// Tokens are refreshed this long before their reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Service-account JWTs are valid for one hour (the maximum Google accepts).
const JWT_LIFETIME_SECS: u64 = 3600;

// =============================================================================
// Credential sources
// =============================================================================

/// Which credential source initialized successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    ServiceAccount,
    ServiceAccountFile,
    OAuth2,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::ServiceAccount => "service account",
            Self::ServiceAccountFile => "service account (file)",
            Self::OAuth2 => "OAuth2",
        };
        f.write_str(label)
    }
}

/// Service account key, as downloaded from the Cloud console.
#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    crate::core::config::GOOGLE_TOKEN_URL.to_string()
}

/// JWT claims for the service-account grant.
#[derive(Debug, Serialize)]
struct JwtClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    exp: u64,
}

/// Response from Google's token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Token file layout shared with the `google-auth` setup command.
///
/// `expiry_date` is epoch milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredToken {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
}

impl StoredToken {
    /// Build the on-disk form of a fresh token endpoint response.
    pub fn from_response(response: TokenResponse, now: SystemTime) -> Self {
        let expiry_date = response.expires_in.map(|secs| {
            let expires = now + Duration::from_secs(secs);
            expires
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as i64)
                .unwrap_or_default()
        });
        Self {
            access_token: Some(response.access_token),
            refresh_token: response.refresh_token,
            scope: response.scope,
            token_type: response.token_type,
            expiry_date,
        }
    }

    fn expires_at(&self) -> Option<SystemTime> {
        let millis = u64::try_from(self.expiry_date?).ok()?;
        Some(UNIX_EPOCH + Duration::from_millis(millis))
    }
}

/// Access token with its expiry; `None` means the upstream never told us.
#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: Option<SystemTime>,
}

impl CachedToken {
    fn is_fresh(&self, now: SystemTime) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at > now + EXPIRY_MARGIN,
            None => true,
        }
    }

    fn from_response(response: &TokenResponse, now: SystemTime) -> Self {
        Self {
            token: response.access_token.clone(),
            expires_at: response.expires_in.map(|secs| now + Duration::from_secs(secs)),
        }
    }
}

/// Service-account authenticator (JWT bearer grant).
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    cached: RwLock<Option<CachedToken>>,
}

impl std::fmt::Debug for ServiceAccountAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountAuth")
            .field("client_email", &self.key.client_email)
            .field("token_uri", &self.key.token_uri)
            .finish()
    }
}

impl ServiceAccountAuth {
    /// Parse a key and validate its private key up front.
    pub fn from_json(json: &str) -> Result<Self> {
        let key: ServiceAccountKey = serde_json::from_str(json)
            .map_err(|e| Error::auth(format!("invalid service account key: {e}")))?;
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| Error::auth(format!("invalid service account private key: {e}")))?;

        Ok(Self {
            key,
            encoding_key,
            cached: RwLock::new(None),
        })
    }

    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::auth(format!(
                "Service account file not found: {}",
                path.display()
            )));
        }
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    async fn access_token(&self, http: &HttpClient) -> Result<String> {
        if let Some(token) = self.cached.read().await.as_ref() {
            if token.is_fresh(SystemTime::now()) {
                return Ok(token.token.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Another task may have refreshed while we waited for the write lock.
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(SystemTime::now()) {
                return Ok(token.token.clone());
            }
        }

        debug!("Fetching service account token for {}", self.key.client_email);
        let now = SystemTime::now();
        let jwt = self.signed_assertion(now)?;
        let request = http.post(&self.key.token_uri).form(&[
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", jwt.as_str()),
        ]);
        let response: TokenResponse = http.send_json(request).await.map_err(token_error)?;

        let token = CachedToken::from_response(&response, now);
        let access = token.token.clone();
        *cached = Some(token);
        Ok(access)
    }

    fn signed_assertion(&self, now: SystemTime) -> Result<String> {
        let iat = now
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::internal(e.to_string()))?
            .as_secs();
        let claims = JwtClaims {
            iss: self.key.client_email.clone(),
            scope: GOOGLE_SCOPES.join(" "),
            aud: self.key.token_uri.clone(),
            iat,
            exp: iat + JWT_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| Error::auth(format!("failed to sign service account JWT: {e}")))
    }
}

/// OAuth2 installed-app authenticator backed by a stored token.
pub struct OAuth2Auth {
    client_id: String,
    client_secret: String,
    token_url: String,
    refresh_token: Option<String>,
    cached: RwLock<Option<CachedToken>>,
}

impl std::fmt::Debug for OAuth2Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Auth")
            .field("client_id", &self.client_id)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

impl OAuth2Auth {
    /// Load the stored token; a missing file fails with the consent URL.
    pub async fn from_token_file(
        client_id: &str,
        client_secret: &str,
        token_url: &str,
        token_file: &Path,
    ) -> Result<Self> {
        if !token_file.exists() {
            let url = authorization_url(client_id, DEFAULT_REDIRECT_URI)?;
            return Err(Error::auth(format!(
                "OAuth2 token not found. Please visit this URL to authorize the application:\n{}\n\n\
                 Then save the token to {} (or run `mcp-dev-workflow google-auth`)",
                url,
                token_file.display()
            )));
        }

        let content = tokio::fs::read_to_string(token_file).await?;
        let stored: StoredToken = serde_json::from_str(&content)
            .map_err(|e| Error::auth(format!("invalid OAuth2 token file: {e}")))?;
        Self::from_stored(client_id, client_secret, token_url, stored)
    }

    pub fn from_stored(
        client_id: &str,
        client_secret: &str,
        token_url: &str,
        stored: StoredToken,
    ) -> Result<Self> {
        if stored.access_token.is_none() && stored.refresh_token.is_none() {
            return Err(Error::auth(
                "OAuth2 token file holds neither an access token nor a refresh token",
            ));
        }

        let expires_at = stored.expires_at();
        let cached = stored.access_token.map(|token| CachedToken { token, expires_at });

        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token_url: token_url.to_string(),
            refresh_token: stored.refresh_token,
            cached: RwLock::new(cached),
        })
    }

    async fn access_token(&self, http: &HttpClient) -> Result<String> {
        if let Some(token) = self.cached.read().await.as_ref() {
            if token.is_fresh(SystemTime::now()) {
                return Ok(token.token.clone());
            }
        }

        let mut cached = self.cached.write().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(SystemTime::now()) {
                return Ok(token.token.clone());
            }
        }

        let refresh_token = self
            .refresh_token
            .as_deref()
            .ok_or_else(|| Error::auth("OAuth2 access token expired and no refresh token is stored"))?;

        debug!("Refreshing OAuth2 access token");
        let now = SystemTime::now();
        let request = http.post(&self.token_url).form(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ]);
        let response: TokenResponse = http.send_json(request).await.map_err(token_error)?;

        let token = CachedToken::from_response(&response, now);
        let access = token.token.clone();
        *cached = Some(token);
        Ok(access)
    }
}

fn token_error(err: Error) -> Error {
    match err {
        Error::Auth(_) => err,
        other => Error::auth(format!("token exchange failed: {other}")),
    }
}

/// Trade an authorization code from the consent redirect for tokens.
pub async fn exchange_code(
    upstream: &UpstreamConfig,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    code: &str,
    redirect_uri: &str,
) -> Result<TokenResponse> {
    let http = HttpClient::new("Google OAuth", upstream, google_error_detail)?;
    let request = http.post(token_url).form(&[
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("code", code),
        ("redirect_uri", redirect_uri),
        ("grant_type", "authorization_code"),
    ]);
    http.send_json(request).await.map_err(token_error)
}

/// Consent URL for the installed-app flow.
pub fn authorization_url(client_id: &str, redirect_uri: &str) -> Result<String> {
    let scope = GOOGLE_SCOPES.join(" ");
    let query = serde_urlencoded::to_string([
        ("client_id", client_id),
        ("redirect_uri", redirect_uri),
        ("response_type", "code"),
        ("access_type", "offline"),
        ("scope", scope.as_str()),
    ])
    .map_err(|e| Error::internal(e.to_string()))?;
    Ok(format!("{GOOGLE_AUTH_URL}?{query}"))
}

/// The credential that won the fallback chain.
#[derive(Debug)]
pub enum GoogleCredentials {
    ServiceAccount {
        source: CredentialSource,
        auth: ServiceAccountAuth,
    },
    OAuth2(OAuth2Auth),
}

impl GoogleCredentials {
    pub fn source(&self) -> CredentialSource {
        match self {
            Self::ServiceAccount { source, .. } => *source,
            Self::OAuth2(_) => CredentialSource::OAuth2,
        }
    }

    async fn access_token(&self, http: &HttpClient) -> Result<String> {
        match self {
            Self::ServiceAccount { auth, .. } => auth.access_token(http).await,
            Self::OAuth2(auth) => auth.access_token(http).await,
        }
    }

    /// Walk the fallback chain; each failure is logged and the next source tried.
    pub async fn resolve(config: &GoogleConfig) -> Result<Self> {
        if let Some(json) = &config.service_account_key {
            match ServiceAccountAuth::from_json(json) {
                Ok(auth) => {
                    return Ok(Self::ServiceAccount {
                        source: CredentialSource::ServiceAccount,
                        auth,
                    });
                }
                Err(e) => warn!("Google Workspace: service account auth failed: {}", e),
            }
        }

        if let Some(path) = &config.service_account_file {
            match ServiceAccountAuth::from_file(path).await {
                Ok(auth) => {
                    return Ok(Self::ServiceAccount {
                        source: CredentialSource::ServiceAccountFile,
                        auth,
                    });
                }
                Err(e) => warn!("Google Workspace: service account file auth failed: {}", e),
            }
        }

        if let (Some(client_id), Some(client_secret)) = (&config.client_id, &config.client_secret) {
            match OAuth2Auth::from_token_file(
                client_id,
                client_secret,
                &config.token_url,
                &config.token_file,
            )
            .await
            {
                Ok(auth) => return Ok(Self::OAuth2(auth)),
                Err(e) => warn!("Google Workspace: OAuth2 auth failed: {}", e),
            }
        }

        Err(Error::auth(
            "No valid Google authentication found. Please set up service account credentials or OAuth2.",
        ))
    }
}

// =============================================================================
// Docs client
// =============================================================================

fn google_error_detail(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("error_description").and_then(Value::as_str))
        .or_else(|| error.as_str())
        .map(str::to_string)
}

/// Google Docs API client.
#[derive(Debug)]
pub struct GoogleDocsClient {
    http: HttpClient,
    base_url: String,
    config: GoogleConfig,
    credentials: OnceCell<GoogleCredentials>,
}

impl GoogleDocsClient {
    pub fn new(config: &GoogleConfig, upstream: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new("Google Docs", upstream, google_error_detail)?,
            base_url: config.docs_api_url.clone(),
            config: config.clone(),
            credentials: OnceCell::new(),
        })
    }

    /// Resolve credentials once; later and concurrent calls reuse the result.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<CredentialSource> {
        let credentials = self
            .credentials
            .get_or_try_init(|| GoogleCredentials::resolve(&self.config))
            .await?;
        let source = credentials.source();
        info!("Google Workspace: {} authentication initialized", source);
        Ok(source)
    }

    /// `GET` a Docs endpoint with a bearer token.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let credentials = self
            .credentials
            .get()
            .ok_or_else(|| Error::auth("Google authentication not initialized"))?;
        let token = credentials.access_token(&self.http).await?;

        let url = join_url(&self.base_url, endpoint);
        let mut request = self.http.get(&url).bearer_auth(token);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.http.send_json(request).await
    }
}
