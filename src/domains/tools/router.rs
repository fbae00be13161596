//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Every registered handler becomes one dynamic route whose body hands the
//! raw arguments back to [`ToolRegistry::call_tool`], which owns rate
//! limiting and error rendering.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter};

use super::registry::ToolRegistry;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .tools()
        .into_iter()
        .fold(ToolRouter::new(), |router, tool| {
            let registry = registry.clone();
            let name = tool.name.clone();
            router.with_route(ToolRoute::new_dyn(
                tool,
                move |ctx: ToolCallContext<'_, S>| {
                    let args = ctx.arguments.clone().unwrap_or_default();
                    let registry = registry.clone();
                    let name = name.clone();
                    async move { Ok(registry.call_tool(&name, args).await) }.boxed()
                },
            ))
        })
}
