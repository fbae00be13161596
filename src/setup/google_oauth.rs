//! One-time Google OAuth2 setup for the Google Workspace adapter.
//!
//! Serves a local callback for the consent redirect, trades the returned
//! authorization code for tokens and writes the token file the OAuth2
//! provider reads at startup.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use crate::core::config::{GoogleConfig, UpstreamConfig};
use crate::core::error::{Error, Result};
use crate::core::upstream::google::{StoredToken, authorization_url, exchange_code};

pub const DEFAULT_CALLBACK_PORT: u16 = 8080;

/// What the consent redirect carried.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Callback {
    Code(String),
    Denied(String),
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

type CallbackSender = Arc<Mutex<Option<oneshot::Sender<Callback>>>>;

/// OAuth2 installed-app flow against a local redirect.
#[derive(Clone)]
pub struct OAuthSetup {
    client_id: String,
    client_secret: String,
    token_url: String,
    token_file: PathBuf,
    port: u16,
    upstream: UpstreamConfig,
}

impl std::fmt::Debug for OAuthSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSetup")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("token_url", &self.token_url)
            .field("token_file", &self.token_file)
            .field("port", &self.port)
            .finish()
    }
}

impl OAuthSetup {
    pub fn new(google: &GoogleConfig, upstream: &UpstreamConfig, port: u16) -> Result<Self> {
        let (Some(client_id), Some(client_secret)) = (&google.client_id, &google.client_secret)
        else {
            return Err(Error::config(
                "GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET must be set. \
                 Get OAuth2 credentials at https://console.cloud.google.com/apis/credentials",
            ));
        };

        Ok(Self {
            client_id: client_id.clone(),
            client_secret: client_secret.clone(),
            token_url: google.token_url.clone(),
            token_file: google.token_file.clone(),
            port,
            upstream: upstream.clone(),
        })
    }

    pub fn token_file(&self) -> &Path {
        &self.token_file
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    pub fn consent_url(&self) -> Result<String> {
        authorization_url(&self.client_id, &self.redirect_uri())
    }

    /// The token file, if a previous setup already wrote one.
    pub fn existing_token(&self) -> Option<&Path> {
        self.token_file.exists().then_some(self.token_file.as_path())
    }

    /// Loopback address matching the redirect URI.
    pub fn callback_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.port))
    }

    /// Start the callback server on `addr`.
    pub async fn listen(&self, addr: SocketAddr) -> Result<CallbackListener> {
        let tcp = TcpListener::bind(addr).await?;
        let local_addr = tcp.local_addr()?;

        let (callback_tx, callback_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let sender: CallbackSender = Arc::new(Mutex::new(Some(callback_tx)));

        let app = Router::new()
            .route("/", get(handle_callback))
            .layer(TraceLayer::new_for_http())
            .with_state(sender);

        let server = tokio::spawn(async move {
            axum::serve(tcp, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!("OAuth callback listening on {}", local_addr);
        Ok(CallbackListener {
            addr: local_addr,
            callback: callback_rx,
            shutdown: shutdown_tx,
            server,
        })
    }

    #[instrument(skip(self, code))]
    async fn save_token(&self, code: &str) -> Result<PathBuf> {
        let response = exchange_code(
            &self.upstream,
            &self.token_url,
            &self.client_id,
            &self.client_secret,
            code,
            &self.redirect_uri(),
        )
        .await?;

        let stored = StoredToken::from_response(response, SystemTime::now());
        let json = serde_json::to_string_pretty(&stored)?;
        tokio::fs::write(&self.token_file, json).await?;
        info!("Google OAuth2 token saved to {}", self.token_file.display());
        Ok(self.token_file.clone())
    }
}

/// A running callback server waiting for one redirect.
#[derive(Debug)]
pub struct CallbackListener {
    addr: SocketAddr,
    callback: oneshot::Receiver<Callback>,
    shutdown: oneshot::Sender<()>,
    server: JoinHandle<std::io::Result<()>>,
}

impl CallbackListener {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the redirect, stop the server and store the token.
    ///
    /// Returns the path of the written token file.
    pub async fn finish(self, setup: &OAuthSetup) -> Result<PathBuf> {
        let callback = self
            .callback
            .await
            .map_err(|_| Error::internal("OAuth callback server stopped before a redirect"))?;

        let _ = self.shutdown.send(());
        if let Err(e) = self.server.await {
            warn!("OAuth callback server task failed: {}", e);
        }

        match callback {
            Callback::Code(code) => setup.save_token(&code).await,
            Callback::Denied(reason) => Err(Error::auth(format!("authorization denied: {reason}"))),
        }
    }
}

async fn handle_callback(
    State(sender): State<CallbackSender>,
    Query(params): Query<CallbackParams>,
) -> impl IntoResponse {
    let (callback, status, page) = match (params.code, params.error) {
        (_, Some(error)) => {
            warn!("OAuth consent returned error: {}", error);
            (
                Callback::Denied(error),
                StatusCode::BAD_REQUEST,
                "<h1>Authentication failed</h1><p>See the terminal for details, then try again.</p>"
                    .to_string(),
            )
        }
        (Some(code), None) => (
            Callback::Code(code),
            StatusCode::OK,
            "<h1>Authentication successful</h1><p>You can close this tab and return to the terminal.</p>"
                .to_string(),
        ),
        (None, None) => {
            return (
                StatusCode::BAD_REQUEST,
                Html("<h1>Missing authorization code</h1>".to_string()),
            );
        }
    };

    let taken = sender.lock().ok().and_then(|mut slot| slot.take());
    match taken {
        Some(tx) => {
            let _ = tx.send(callback);
        }
        None => warn!("Ignoring repeated OAuth callback"),
    }
    (status, Html(format!("<html><body>{page}</body></html>")))
}
