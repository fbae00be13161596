//! Component listing and design-token extraction.

use std::fmt::Write;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::files::NO_CONTENT;
use super::model::FigmaFile;
use crate::core::error::Result;
use crate::core::upstream::{FigmaClient, extract_file_key};
use crate::domains::tokens::{
    TokenCategory, TokenFormat, extract_design_tokens, format_color, render_tokens,
};
use crate::domains::tools::handlers::ToolDefinition;
use crate::domains::tree::{Node, NodeType, Paint, PaintKind, filter_by_type};

// =============================================================================
// get_figma_components
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentKind {
    Component,
    ComponentSet,
    Instance,
}

impl From<ComponentKind> for NodeType {
    fn from(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Component => NodeType::Component,
            ComponentKind::ComponentSet => NodeType::ComponentSet,
            ComponentKind::Instance => NodeType::Instance,
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetFigmaComponentsParams {
    #[schemars(description = "Figma file key or URL")]
    pub file_key: String,

    #[schemars(description = "Include component instances in results")]
    #[serde(default)]
    pub include_instances: bool,

    #[schemars(description = "Filter by component type (optional)")]
    #[serde(default)]
    pub component_type: Option<ComponentKind>,
}

pub struct GetFigmaComponentsTool {
    client: Arc<FigmaClient>,
}

impl GetFigmaComponentsTool {
    pub fn new(client: Arc<FigmaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for GetFigmaComponentsTool {
    const NAME: &'static str = "get_figma_components";
    const DESCRIPTION: &'static str =
        "Get components and component sets from a Figma file, with sizes, variants and styles";
    type Params = GetFigmaComponentsParams;

    async fn execute(&self, params: GetFigmaComponentsParams) -> Result<String> {
        let file_key = extract_file_key(&params.file_key)?;
        let file: FigmaFile = self.client.request(&format!("/files/{file_key}")).await?;
        Ok(list_components(&file, &params))
    }
}

/// Components of the requested kind, or components and sets (plus
/// instances when asked), each group in document order.
pub fn collect_components<'a>(pages: &'a [Node], params: &GetFigmaComponentsParams) -> Vec<&'a Node> {
    if let Some(kind) = params.component_type {
        return filter_by_type(pages, &kind.into());
    }

    let mut components = filter_by_type(pages, &NodeType::Component);
    components.extend(filter_by_type(pages, &NodeType::ComponentSet));
    if params.include_instances {
        components.extend(filter_by_type(pages, &NodeType::Instance));
    }
    components
}

pub fn list_components(file: &FigmaFile, params: &GetFigmaComponentsParams) -> String {
    let pages = file.pages();
    if pages.is_empty() {
        return NO_CONTENT.to_string();
    }

    let components = collect_components(pages, params);
    let type_suffix = params
        .component_type
        .map(|kind| format!(" of type {}", NodeType::from(kind)))
        .unwrap_or_default();

    if components.is_empty() {
        return format!("# Components\n\nNo components found{type_suffix} in this file.");
    }

    let mut content = format!(
        "# Components in Figma File\n\nFound {} component(s){}:\n\n",
        components.len(),
        type_suffix
    );
    for (index, component) in components.iter().enumerate() {
        write_component(&mut content, index + 1, component);
    }
    content
}

fn write_component(content: &mut String, number: usize, component: &Node) {
    let _ = write!(
        content,
        "## {}. {}\n\n**Type:** {}\n**ID:** {}\n",
        number,
        component.display_name().unwrap_or("Unnamed Component"),
        component.node_type,
        component.id
    );

    if let Some(description) = component.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(content, "**Description:** {description}");
    }

    if let Some(bounds) = &component.absolute_bounding_box {
        let _ = writeln!(
            content,
            "**Size:** {} × {}",
            bounds.width.round(),
            bounds.height.round()
        );
    }

    match &component.node_type {
        NodeType::ComponentSet => {
            let _ = writeln!(content, "**Variants:** {}", component.children.len());
            if !component.children.is_empty() {
                let names: Vec<&str> = component.children.iter().map(Node::label).collect();
                let _ = writeln!(content, "**Variant Names:** {}", names.join(", "));
            }
        }
        NodeType::Instance => {
            if let Some(master) = &component.component_id {
                let _ = writeln!(content, "**Master Component:** {master}");
            }
        }
        _ => {}
    }

    let fills: Vec<String> = component.visible_fills().map(describe_paint).collect();
    if !fills.is_empty() {
        let _ = writeln!(content, "**Background:** {}", fills.join(", "));
    }

    let effects: Vec<&str> = component
        .visible_effects()
        .map(|effect| effect.kind.type_tag())
        .collect();
    if !effects.is_empty() {
        let _ = writeln!(content, "**Effects:** {}", effects.join(", "));
    }

    content.push_str("\n---\n\n");
}

/// Short human description of one paint.
pub fn describe_paint(paint: &Paint) -> String {
    match &paint.kind {
        PaintKind::Solid(color) => format_color(color.as_ref()),
        PaintKind::GradientLinear => "Linear gradient".to_string(),
        PaintKind::GradientRadial => "Radial gradient".to_string(),
        PaintKind::Image => "Image fill".to_string(),
        other => other.type_tag().to_string(),
    }
}

// =============================================================================
// get_design_tokens
// =============================================================================

fn all_categories() -> Vec<TokenCategory> {
    TokenCategory::ALL.to_vec()
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetDesignTokensParams {
    #[schemars(description = "Figma file key or URL")]
    pub file_key: String,

    #[schemars(description = "Types of design tokens to extract")]
    #[serde(default = "all_categories")]
    pub token_types: Vec<TokenCategory>,

    #[schemars(description = "Output format for design tokens")]
    #[serde(default)]
    pub format: TokenFormat,

    #[schemars(description = "Page names to extract tokens from (optional, defaults to all pages)")]
    #[serde(default)]
    pub filter_pages: Option<Vec<String>>,
}

pub struct GetDesignTokensTool {
    client: Arc<FigmaClient>,
}

impl GetDesignTokensTool {
    pub fn new(client: Arc<FigmaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for GetDesignTokensTool {
    const NAME: &'static str = "get_design_tokens";
    const DESCRIPTION: &'static str =
        "Extract design tokens (colors, typography, spacing, effects) from a Figma file";
    type Params = GetDesignTokensParams;

    async fn execute(&self, params: GetDesignTokensParams) -> Result<String> {
        let file_key = extract_file_key(&params.file_key)?;
        let file: FigmaFile = self.client.request(&format!("/files/{file_key}")).await?;
        Ok(design_tokens(&file, &params))
    }
}

pub fn design_tokens(file: &FigmaFile, params: &GetDesignTokensParams) -> String {
    let pages = file.pages();
    if pages.is_empty() {
        return NO_CONTENT.to_string();
    }

    let tokens = match params.filter_pages.as_deref() {
        Some(names) if !names.is_empty() => {
            let selected: Vec<Node> = pages
                .iter()
                .filter(|page| {
                    page.name
                        .as_deref()
                        .is_some_and(|name| names.iter().any(|wanted| wanted == name))
                })
                .cloned()
                .collect();
            extract_design_tokens(&selected)
        }
        _ => extract_design_tokens(pages),
    };
    let tokens = tokens.retain(&params.token_types);
    info!(
        "Extracted {} colors, {} typography, {} spacing, {} effects",
        tokens.colors.len(),
        tokens.typography.len(),
        tokens.spacing.len(),
        tokens.effects.len()
    );

    if tokens.is_empty() {
        let requested: Vec<&str> = params.token_types.iter().map(TokenCategory::as_str).collect();
        return format!(
            "# Design Tokens\n\nNo design tokens found for types: {}",
            requested.join(", ")
        );
    }

    render_tokens(&tokens, params.format)
}
