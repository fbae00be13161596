//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the adapter
//! servers: adapter wiring, error handling, configuration, the request rate
//! limiter, the upstream REST providers, server lifecycle management and the
//! stdio transport.

pub mod adapter;
pub mod config;
pub mod error;
pub mod rate_limiter;
pub mod server;
pub mod transport;
pub mod upstream;

pub use adapter::Adapter;
pub use config::Config;
pub use error::{Error, Result};
pub use rate_limiter::RateLimiter;
pub use server::McpServer;
pub use transport::StdioTransport;
