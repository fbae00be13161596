//! File-level Figma tools: file overview, comments and layer search.

use std::fmt::Write;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::model::{CommentsResponse, FigmaFile};
use crate::core::error::Result;
use crate::core::upstream::{FigmaClient, extract_file_key};
use crate::domains::tools::definitions::common::{default_true, format_datetime};
use crate::domains::tools::handlers::ToolDefinition;
use crate::domains::tree::{NodeType, SearchOptions, SearchResult, render_structure, search, truncate};

pub const NO_CONTENT: &str = "No content found in the Figma file.";

const TEXT_CONTENT_LEN: usize = 100;

fn default_depth() -> usize {
    3
}

// =============================================================================
// get_figma_file
// =============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetFigmaFileParams {
    #[schemars(description = "Figma file key or URL")]
    pub file_key: String,

    #[schemars(description = "Include document structure in response")]
    #[serde(default = "default_true")]
    pub include_document: bool,

    #[schemars(description = "Maximum depth to traverse in document tree")]
    #[serde(default = "default_depth")]
    pub depth: usize,
}

/// File overview with an outline of its pages.
pub struct GetFigmaFileTool {
    client: Arc<FigmaClient>,
}

impl GetFigmaFileTool {
    pub fn new(client: Arc<FigmaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for GetFigmaFileTool {
    const NAME: &'static str = "get_figma_file";
    const DESCRIPTION: &'static str = "Get details and content of a Figma file";
    type Params = GetFigmaFileParams;

    async fn execute(&self, params: GetFigmaFileParams) -> Result<String> {
        let file_key = extract_file_key(&params.file_key)?;
        info!("Fetching Figma file {}", file_key);

        let file: FigmaFile = self.client.request(&format!("/files/{file_key}")).await?;
        Ok(format_file(
            &file_key,
            &file,
            params.include_document,
            params.depth,
        ))
    }
}

pub fn format_file(file_key: &str, file: &FigmaFile, include_document: bool, depth: usize) -> String {
    let pages = file.pages();
    let mut content = format!(
        "# Figma File: {name}\n\n\
         **File Key:** {file_key}\n\
         **Last Modified:** {modified}\n\
         **Version:** {version}\n\
         **Thumbnail:** {thumbnail}\n\n\
         ## File Information\n\
         - **Pages:** {pages}\n\
         - **Role:** {role}\n\
         - **Editor Type:** {editor}\n",
        name = file.name,
        modified = file
            .last_modified
            .as_deref()
            .map(format_datetime)
            .unwrap_or_else(|| "Unknown".to_string()),
        version = file.version.as_deref().unwrap_or("Unknown"),
        thumbnail = file.thumbnail_url.as_deref().unwrap_or("Not available"),
        pages = pages.len(),
        role = file.role.as_deref().unwrap_or("viewer"),
        editor = file.editor_type.as_deref().unwrap_or("design"),
    );

    if include_document && !pages.is_empty() {
        content.push_str("\n## Document Structure\n\n");
        content.push_str(&render_structure(pages, depth));
    }

    content
}

// =============================================================================
// get_figma_comments
// =============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetFigmaCommentsParams {
    #[schemars(description = "Figma file key or URL")]
    pub file_key: String,
}

pub struct GetFigmaCommentsTool {
    client: Arc<FigmaClient>,
}

impl GetFigmaCommentsTool {
    pub fn new(client: Arc<FigmaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for GetFigmaCommentsTool {
    const NAME: &'static str = "get_figma_comments";
    const DESCRIPTION: &'static str = "Get comments from a Figma file";
    type Params = GetFigmaCommentsParams;

    async fn execute(&self, params: GetFigmaCommentsParams) -> Result<String> {
        let file_key = extract_file_key(&params.file_key)?;
        let response: CommentsResponse = self
            .client
            .request(&format!("/files/{file_key}/comments"))
            .await?;
        debug!("Fetched {} comments", response.comments.len());
        Ok(format_comments(&response))
    }
}

pub fn format_comments(response: &CommentsResponse) -> String {
    if response.comments.is_empty() {
        return "# Comments for Figma File\n\nNo comments found in this file.".to_string();
    }

    let mut content = format!(
        "# Comments for Figma File\n\nFound {} comment(s):\n\n",
        response.comments.len()
    );

    for (index, comment) in response.comments.iter().enumerate() {
        let author = comment
            .user
            .as_ref()
            .and_then(|user| user.handle.as_deref())
            .unwrap_or("Unknown");
        let created = comment
            .created_at
            .as_deref()
            .map(format_datetime)
            .unwrap_or_else(|| "Unknown".to_string());

        let _ = write!(
            content,
            "## Comment {}\n**Author:** {}\n**Created:** {}\n**Message:** {}\n",
            index + 1,
            author,
            created,
            comment.message
        );

        if let Some(meta) = &comment.client_meta {
            if let Some(node_id) = &meta.node_id {
                let _ = writeln!(content, "**Node:** {node_id}");
            }
            if let Some(offset) = &meta.node_offset {
                let _ = writeln!(content, "**Position:** x: {}, y: {}", offset.x, offset.y);
            }
        }

        content.push_str("\n---\n\n");
    }

    content
}

// =============================================================================
// search_figma_layers
// =============================================================================

/// Layer types the search can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayerType {
    Frame,
    Group,
    Text,
    Rectangle,
    Ellipse,
    Component,
    Instance,
}

impl From<LayerType> for NodeType {
    fn from(layer: LayerType) -> Self {
        match layer {
            LayerType::Frame => NodeType::Frame,
            LayerType::Group => NodeType::Group,
            LayerType::Text => NodeType::Text,
            LayerType::Rectangle => NodeType::Rectangle,
            LayerType::Ellipse => NodeType::Ellipse,
            LayerType::Component => NodeType::Component,
            LayerType::Instance => NodeType::Instance,
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchFigmaLayersParams {
    #[schemars(description = "Figma file key or URL")]
    pub file_key: String,

    #[schemars(description = "Term to search for in layer names and text content")]
    pub search_term: String,

    #[schemars(description = "Filter by specific node type (optional)")]
    #[serde(default)]
    pub node_type: Option<LayerType>,

    #[schemars(description = "Whether search should be case sensitive")]
    #[serde(default)]
    pub case_sensitive: bool,
}

pub struct SearchFigmaLayersTool {
    client: Arc<FigmaClient>,
}

impl SearchFigmaLayersTool {
    pub fn new(client: Arc<FigmaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for SearchFigmaLayersTool {
    const NAME: &'static str = "search_figma_layers";
    const DESCRIPTION: &'static str = "Search for layers or frames within a Figma file";
    type Params = SearchFigmaLayersParams;

    async fn execute(&self, params: SearchFigmaLayersParams) -> Result<String> {
        let file_key = extract_file_key(&params.file_key)?;
        let file: FigmaFile = self.client.request(&format!("/files/{file_key}")).await?;
        Ok(search_layers(&file, &params))
    }
}

pub fn search_layers(file: &FigmaFile, params: &SearchFigmaLayersParams) -> String {
    let pages = file.pages();
    if pages.is_empty() {
        return NO_CONTENT.to_string();
    }

    let options = SearchOptions::default().case_sensitive(params.case_sensitive);
    let wanted = params.node_type.map(NodeType::from);
    let hits: Vec<SearchResult<'_>> = search(pages, &params.search_term, options)
        .into_iter()
        .filter(|hit| wanted.as_ref().is_none_or(|t| hit.node.is_type(t)))
        .collect();

    let type_suffix = wanted
        .as_ref()
        .map(|t| format!(" of type {t}"))
        .unwrap_or_default();

    if hits.is_empty() {
        return format!(
            "# Search Results\n\nNo layers found matching \"{}\"{}.",
            params.search_term, type_suffix
        );
    }

    let mut content = format!(
        "# Search Results for \"{}\"\n\nFound {} matching layer(s){}:\n\n",
        params.search_term,
        hits.len(),
        type_suffix
    );

    for (index, hit) in hits.iter().enumerate() {
        let node = hit.node;
        let _ = write!(
            content,
            "## {}. {}\n**Type:** {}\n**Path:** {}\n",
            index + 1,
            node.label(),
            node.node_type,
            hit.path.join(" → ")
        );

        if let Some(text) = &node.characters {
            let _ = writeln!(
                content,
                "**Text Content:** \"{}\"",
                truncate(text, TEXT_CONTENT_LEN)
            );
        }

        if let Some(bounds) = &node.absolute_bounding_box {
            let _ = writeln!(content, "**Position:** x: {}, y: {}", bounds.x, bounds.y);
            let _ = writeln!(content, "**Size:** {} × {}", bounds.width, bounds.height);
        }

        let fills = node.visible_fills().count();
        if fills > 0 {
            let _ = writeln!(content, "**Fills:** {fills} fill(s)");
        }

        content.push_str("\n---\n\n");
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn file() -> FigmaFile {
        serde_json::from_value(json!({
            "name": "Marketing site",
            "lastModified": "2024-03-05T14:07:00Z",
            "version": "42",
            "document": {"id": "0:0", "type": "DOCUMENT", "children": [
                {"id": "1:0", "name": "Home", "type": "CANVAS", "children": [
                    {"id": "1:1", "name": "Primary Button", "type": "COMPONENT",
                     "absoluteBoundingBox": {"x": 10, "y": 20.5, "width": 120, "height": 40},
                     "fills": [
                        {"type": "SOLID", "color": {"r": 0, "g": 0, "b": 1, "a": 1}},
                        {"type": "SOLID", "visible": false, "color": {"r": 1, "g": 1, "b": 1}}
                     ],
                     "children": [
                        {"id": "1:2", "name": "Label", "type": "TEXT", "characters": "Buy now"}
                     ]},
                    {"id": "1:3", "type": "TEXT", "characters": "button copy"}
                ]}
            ]}
        }))
        .unwrap()
    }

    fn search_params(term: &str, node_type: Option<LayerType>) -> SearchFigmaLayersParams {
        SearchFigmaLayersParams {
            file_key: "abc".to_string(),
            search_term: term.to_string(),
            node_type,
            case_sensitive: false,
        }
    }

    #[test]
    fn test_params_defaults() {
        let params: GetFigmaFileParams = serde_json::from_value(json!({"file_key": "abc"})).unwrap();
        assert!(params.include_document);
        assert_eq!(params.depth, 3);
    }

    #[test]
    fn test_format_file_header_and_structure() {
        let text = format_file("abc", &file(), true, 1);
        assert!(text.starts_with("# Figma File: Marketing site\n\n**File Key:** abc\n"));
        assert!(text.contains("**Last Modified:** March 5, 2024, 02:07 PM"));
        assert!(text.contains("**Thumbnail:** Not available"));
        assert!(text.contains("- **Pages:** 1\n- **Role:** viewer\n- **Editor Type:** design\n"));
        assert!(text.ends_with("## Document Structure\n\n- **Home** (CANVAS)\n"));

        let without = format_file("abc", &file(), false, 3);
        assert!(!without.contains("Document Structure"));
    }

    #[test]
    fn test_format_comments() {
        let response: CommentsResponse = serde_json::from_value(json!({"comments": [
            {"message": "Looks good", "created_at": "2024-03-05T14:07:00Z",
             "user": {"handle": "sam"},
             "client_meta": {"node_id": "1:1", "node_offset": {"x": 4, "y": 8}}}
        ]}))
        .unwrap();
        let text = format_comments(&response);
        assert!(text.starts_with("# Comments for Figma File\n\nFound 1 comment(s):\n\n## Comment 1\n"));
        assert!(text.contains("**Author:** sam\n"));
        assert!(text.contains("**Node:** 1:1\n**Position:** x: 4, y: 8\n"));
        assert!(text.ends_with("\n---\n\n"));

        let none = format_comments(&CommentsResponse::default());
        assert!(none.ends_with("No comments found in this file."));
    }

    #[test]
    fn test_search_layers_reports_path_and_details() {
        let text = search_layers(&file(), &search_params("button", None));
        assert!(text.starts_with("# Search Results for \"button\"\n\nFound 2 matching layer(s):\n\n"));
        assert!(text.contains("## 1. Primary Button\n**Type:** COMPONENT\n**Path:** Home → Primary Button\n"));
        assert!(text.contains("**Position:** x: 10, y: 20.5\n**Size:** 120 × 40\n"));
        assert!(text.contains("**Fills:** 1 fill(s)\n"));
        assert!(text.contains("## 2. TEXT\n**Type:** TEXT\n**Path:** Home → TEXT\n**Text Content:** \"button copy\"\n"));
    }

    #[test]
    fn test_search_layers_type_filter_and_no_hits() {
        let text = search_layers(&file(), &search_params("button", Some(LayerType::Text)));
        assert!(text.contains("Found 1 matching layer(s) of type TEXT:"));

        let none = search_layers(&file(), &search_params("footer", Some(LayerType::Frame)));
        assert_eq!(
            none,
            "# Search Results\n\nNo layers found matching \"footer\" of type FRAME."
        );

        assert_eq!(
            search_layers(&FigmaFile::default(), &search_params("x", None)),
            NO_CONTENT
        );
    }

    #[test]
    fn test_layer_type_wire_names() {
        let params: SearchFigmaLayersParams = serde_json::from_value(json!({
            "file_key": "abc", "search_term": "x", "node_type": "RECTANGLE"
        }))
        .unwrap();
        assert_eq!(params.node_type, Some(LayerType::Rectangle));
        assert!(!params.case_sensitive);
    }
}
