//! Offline setup commands that run instead of an adapter.
//!
//! - `config_gen`: launcher configuration from `servers.config.json`
//! - `google_oauth`: one-time OAuth2 consent for the Google Workspace adapter

pub mod config_gen;
pub mod google_oauth;

pub use config_gen::{LauncherConfig, SERVERS_CONFIG_FILE, ServersConfig};
pub use google_oauth::{CallbackListener, DEFAULT_CALLBACK_PORT, OAuthSetup};
