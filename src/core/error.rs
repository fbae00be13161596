//! Error types and handling for the adapter servers.
//!
//! This module defines a unified error type covering every failure a tool
//! invocation can run into: credentials, upstream HTTP failures, unresolvable
//! identifiers, the local rate limiter and bad arguments. The dispatcher turns
//! any of these into a single line of prose for the caller.

use std::time::Duration;

use thiserror::Error;

/// A specialized Result type for adapter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the adapter servers.
#[derive(Debug, Error)]
pub enum Error {
    /// No credential source initialized, or the upstream rejected the token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The upstream API answered with a non-2xx status.
    #[error("{service} API error: {status}{}", format_detail(.message))]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
        body: Option<serde_json::Value>,
    },

    /// A resource identifier could not be resolved from the input.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The local rate limiter denied the call.
    #[error(
        "Rate limit exceeded. Please wait {} seconds before trying again.",
        wait_secs(.wait)
    )]
    RateLimited { wait: Duration },

    /// A tool argument was missing or malformed.
    #[error("Invalid arguments: {0}")]
    Validation(String),

    /// Error originating from the tools registry.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error originating from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] crate::core::transport::TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level HTTP failures (connect, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn wait_secs(wait: &Duration) -> u128 {
    wait.as_millis().div_ceil(1000)
}

fn format_detail(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(" - {message}")
    }
}

impl Error {
    /// Create a new authentication error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a new "not found" error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status of an upstream failure, if this is one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
