//! Tools domain module.
//!
//! Tools are the named operations an adapter exposes to MCP clients. Each
//! adapter contributes a fixed list of handlers; the registry validates the
//! list once at startup and every call goes through it.
//!
//! ## Architecture
//!
//! - `definitions/` - tool implementations, grouped per upstream
//! - `handlers.rs` - `ToolDefinition` / `ToolHandler` traits
//! - `registry.rs` - name → handler table, rate limiting, error rendering
//! - `router.rs` - rmcp `ToolRouter` built from the registry
//! - `error.rs` - registry error types
//!
//! ## Adding a New Tool
//!
//! 1. Add a params struct and a type implementing `ToolDefinition` under
//!    `definitions/<upstream>/`
//! 2. Add it to that upstream's `*_tools()` list
//!
//! Neither the router nor `server.rs` needs to change.

pub mod definitions;
mod error;
mod handlers;
mod registry;
pub mod router;

pub use error::ToolError;
pub use handlers::*;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
