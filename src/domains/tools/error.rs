//! Tool-specific error types.

use thiserror::Error;

/// Errors raised while building or dispatching through the tool registry.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No handler is registered under this name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Two handlers were registered under the same name.
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "duplicate tool" error.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateTool(name.into())
    }
}
