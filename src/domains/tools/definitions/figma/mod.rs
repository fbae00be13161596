//! Figma tools.
//!
//! - `files.rs` - file overview, comments, layer search
//! - `components.rs` - components and design tokens
//! - `assets.rs` - rendered asset export

pub mod assets;
pub mod components;
pub mod files;
pub mod model;

use std::sync::Arc;

pub use assets::{AssetType, ExportFigmaAssetsParams, ExportFigmaAssetsTool, ExportFormat};
pub use components::{
    ComponentKind, GetDesignTokensParams, GetDesignTokensTool, GetFigmaComponentsParams,
    GetFigmaComponentsTool,
};
pub use files::{
    GetFigmaCommentsParams, GetFigmaCommentsTool, GetFigmaFileParams, GetFigmaFileTool,
    LayerType, SearchFigmaLayersParams, SearchFigmaLayersTool,
};

use crate::core::upstream::FigmaClient;
use crate::domains::tools::handlers::ToolHandler;

/// Every Figma tool, sharing one client.
pub fn figma_tools(client: Arc<FigmaClient>) -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(GetFigmaFileTool::new(client.clone())),
        Arc::new(GetFigmaCommentsTool::new(client.clone())),
        Arc::new(SearchFigmaLayersTool::new(client.clone())),
        Arc::new(GetFigmaComponentsTool::new(client.clone())),
        Arc::new(GetDesignTokensTool::new(client.clone())),
        Arc::new(ExportFigmaAssetsTool::new(client)),
    ]
}
