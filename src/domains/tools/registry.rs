//! Tool Registry - the static name → handler table of one adapter.
//!
//! Built once at startup from the adapter's handlers, rejecting duplicate
//! names. Every call passes the rate limiter first; any failure becomes a
//! single text payload naming the tool, never a protocol-level fault.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use tracing::{info, instrument, warn};

use super::error::ToolError;
use super::handlers::ToolHandler;
use crate::core::error::Error;
use crate::core::rate_limiter::RateLimiter;

/// Tool registry - manages the tools of one adapter.
pub struct ToolRegistry {
    handlers: Vec<Arc<dyn ToolHandler>>,
    index: HashMap<&'static str, usize>,
    limiter: RateLimiter,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .field("limiter", &self.limiter)
            .finish()
    }
}

impl ToolRegistry {
    /// Register `handlers` in order; a repeated name is an error.
    pub fn new(handlers: Vec<Arc<dyn ToolHandler>>, limiter: RateLimiter) -> Result<Self, ToolError> {
        let mut index = HashMap::with_capacity(handlers.len());
        for (position, handler) in handlers.iter().enumerate() {
            if index.insert(handler.name(), position).is_some() {
                return Err(ToolError::duplicate(handler.name()));
            }
        }

        Ok(Self {
            handlers,
            index,
            limiter,
        })
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Get all tools as Tool models (metadata).
    pub fn tools(&self) -> Vec<Tool> {
        self.handlers.iter().map(|h| h.to_tool()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.index.get(name).map(|&position| &self.handlers[position])
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Dispatch a tool call and render the outcome as text.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(&self, name: &str, arguments: JsonObject) -> CallToolResult {
        match self.dispatch(name, arguments).await {
            Ok(text) => {
                info!("Tool {} succeeded", name);
                CallToolResult::success(vec![Content::text(text)])
            }
            Err(e) => {
                warn!("Error executing tool {}: {}", name, e);
                CallToolResult::error(vec![Content::text(format!("Error in {}: {}", name, e))])
            }
        }
    }

    async fn dispatch(&self, name: &str, arguments: JsonObject) -> Result<String, Error> {
        self.limiter.check()?;
        let handler = self.get(name).ok_or_else(|| ToolError::unknown(name))?;
        handler.invoke(arguments).await
    }
}
