//! MCP Server implementation and lifecycle management.
//!
//! `McpServer` is the rmcp handler of one adapter process. It owns the tool
//! registry built at startup and exposes it through a `ToolRouter`; tool
//! calls are routed by `#[tool_handler]` into the registry's dispatcher.
//!
//! The ToolRouter is built from the registry in `domains/tools/router.rs`,
//! so adding a tool never touches this file.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;

use super::adapter::Adapter;
use super::config::Config;
use crate::domains::tools::{ToolRegistry, build_tool_router};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Name reported to clients.
    name: String,

    instructions: &'static str,

    /// Tool handlers of this adapter.
    registry: Arc<ToolRegistry>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a server for `adapter` around an already initialized registry.
    pub fn new(config: Config, adapter: Adapter, registry: ToolRegistry) -> Self {
        let registry = Arc::new(registry);
        let name = config
            .server
            .name
            .clone()
            .unwrap_or_else(|| adapter.server_name().to_string());

        Self {
            tool_router: build_tool_router::<Self>(registry.clone()),
            config: Arc::new(config),
            name,
            instructions: adapter.instructions(),
            registry,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            instructions: Some(self.instructions.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
