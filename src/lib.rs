//! MCP adapter servers for Figma, GitHub and Google Docs.
//!
//! One binary, three adapters: each `serve <adapter>` process exposes a
//! fixed set of read-only tools over the Model Context Protocol on stdio,
//! translating tool calls into REST requests against one upstream and
//! rendering the answers as markdown.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the rate limiter, upstream
//!   providers, adapter wiring, the MCP server and its stdio transport
//! - **domains**: business logic
//!   - **tree**: Figma node model and query engine
//!   - **tokens**: design token extraction and rendering
//!   - **docs**: Google Docs content extraction and search
//!   - **tools**: tool definitions, registry and router
//! - **setup**: launcher config generation and Google OAuth setup
//!
//! # Example
//!
//! ```rust,no_run
//! use mcp_dev_workflow::core::{Adapter, Config, McpServer, StdioTransport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let registry = Adapter::Github.build_registry(&config).await?;
//!     let server = McpServer::new(config, Adapter::Github, registry);
//!     StdioTransport::run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;
pub mod setup;

// Re-export commonly used types for convenience
pub use core::{Adapter, Config, Error, McpServer, Result};
