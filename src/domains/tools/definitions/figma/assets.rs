//! Asset export: pick nodes, ask Figma to render them, report download URLs.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::model::{FigmaFile, ImagesResponse, NodesResponse};
use crate::core::error::{Error, Result};
use crate::core::upstream::{FigmaClient, extract_file_key};
use crate::domains::tools::handlers::ToolDefinition;
use crate::domains::tree::{Node, NodeType, PaintKind, filter_by_type, flatten};

/// Largest box (both sides, px) still treated as an icon.
const ICON_MAX_SIZE: f64 = 100.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Jpg,
    #[default]
    Png,
    Svg,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
        }
    }
}

/// Which nodes count as exportable when no ids are given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// Components and component sets.
    #[default]
    Components,
    /// Components or frames no larger than 100×100.
    Icons,
    /// Nodes with an image fill.
    Images,
    Frames,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Components => "components",
            Self::Icons => "icons",
            Self::Images => "images",
            Self::Frames => "frames",
        }
    }
}

fn default_scale() -> u8 {
    1
}

fn default_max_assets() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExportFigmaAssetsParams {
    #[schemars(description = "Figma file key or URL")]
    pub file_key: String,

    #[schemars(
        description = "Specific node IDs to export (optional - if not provided, will find exportable assets)"
    )]
    #[serde(default)]
    pub node_ids: Option<Vec<String>>,

    #[schemars(description = "Export format")]
    #[serde(default)]
    pub format: ExportFormat,

    #[schemars(description = "Export scale factor (1-4)")]
    #[serde(default = "default_scale")]
    pub scale: u8,

    #[schemars(description = "Type of assets to export")]
    #[serde(default)]
    pub asset_type: AssetType,

    #[schemars(description = "Maximum number of assets to export")]
    #[serde(default = "default_max_assets")]
    pub max_assets: usize,
}

pub struct ExportFigmaAssetsTool {
    client: Arc<FigmaClient>,
}

impl ExportFigmaAssetsTool {
    pub fn new(client: Arc<FigmaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for ExportFigmaAssetsTool {
    const NAME: &'static str = "export_figma_assets";
    const DESCRIPTION: &'static str =
        "Export assets (images, icons, components) from a Figma file";
    type Params = ExportFigmaAssetsParams;

    async fn execute(&self, params: ExportFigmaAssetsParams) -> Result<String> {
        if !(1..=4).contains(&params.scale) {
            return Err(Error::validation(format!(
                "scale must be between 1 and 4, got {}",
                params.scale
            )));
        }
        let file_key = extract_file_key(&params.file_key)?;

        let mut ids = match params.node_ids.as_deref() {
            Some(ids) if !ids.is_empty() => ids.to_vec(),
            _ => {
                let file: FigmaFile = self.client.request(&format!("/files/{file_key}")).await?;
                find_exportable(file.pages(), params.asset_type)
            }
        };
        ids.truncate(params.max_assets);

        if ids.is_empty() {
            return Ok(format!(
                "# Asset Export\n\nNo {} found to export in this file.",
                params.asset_type.as_str()
            ));
        }

        info!("Exporting {} asset(s) from {}", ids.len(), file_key);
        let joined = ids.join(",");
        let export: ImagesResponse = self
            .client
            .request_with_query(
                &format!("/images/{file_key}"),
                &[
                    ("ids", joined.clone()),
                    ("format", params.format.as_str().to_string()),
                    ("scale", params.scale.to_string()),
                ],
            )
            .await?;

        let images = match export.images {
            Some(images) if !images.is_empty() => images,
            _ => {
                warn!("Figma returned no export URLs for {}", file_key);
                return Ok("# Asset Export\n\nFailed to generate export URLs. The assets might not be exportable or there was an API error.".to_string());
            }
        };

        let nodes: NodesResponse = self
            .client
            .request_with_query(&format!("/files/{file_key}/nodes"), &[("ids", joined)])
            .await?;

        Ok(format_export(&params, &ids, &images, &nodes))
    }
}

/// Candidate node ids for an asset type, sorted by name.
pub fn find_exportable(pages: &[Node], asset_type: AssetType) -> Vec<String> {
    let mut candidates: Vec<&Node> = match asset_type {
        AssetType::Components => {
            let mut nodes = filter_by_type(pages, &NodeType::Component);
            nodes.extend(filter_by_type(pages, &NodeType::ComponentSet));
            nodes
        }
        AssetType::Icons => flatten(pages)
            .into_iter()
            .filter(|node| matches!(node.node_type, NodeType::Component | NodeType::Frame))
            .filter(|node| {
                node.absolute_bounding_box.is_some_and(|bounds| {
                    bounds.width <= ICON_MAX_SIZE && bounds.height <= ICON_MAX_SIZE
                })
            })
            .collect(),
        AssetType::Images => flatten(pages)
            .into_iter()
            .filter(|node| node.fills.iter().any(|fill| fill.kind == PaintKind::Image))
            .collect(),
        AssetType::Frames => filter_by_type(pages, &NodeType::Frame),
    };

    candidates.sort_by_cached_key(|node| node.name.as_deref().unwrap_or_default().to_lowercase());
    candidates.into_iter().map(|node| node.id.clone()).collect()
}

pub fn format_export(
    params: &ExportFigmaAssetsParams,
    ids: &[String],
    images: &HashMap<String, Option<String>>,
    nodes: &NodesResponse,
) -> String {
    let rendered: Vec<(&str, Option<&str>)> = ids
        .iter()
        .filter_map(|id| {
            images
                .get(id)
                .map(|url| (id.as_str(), url.as_deref().filter(|u| !u.is_empty())))
        })
        .collect();

    let extension = params.format.as_str();
    let mut content = format!(
        "# Figma Asset Export\n\n\
         Successfully generated export URLs for {} asset(s):\n\n\
         **Format:** {}\n\
         **Scale:** {}x\n\
         **Type:** {}\n\n\
         ## Assets\n\n",
        rendered.len(),
        extension.to_uppercase(),
        params.scale,
        params.asset_type.as_str()
    );

    for (index, (id, url)) in rendered.iter().enumerate() {
        let node = nodes.node(id);
        let fallback = format!("Asset {}", index + 1);
        let name = node.and_then(Node::display_name).unwrap_or(fallback.as_str());

        let _ = write!(
            content,
            "### {}. {}\n\n**Node ID:** {}\n**Type:** {}\n",
            index + 1,
            name,
            id,
            node.map(|n| n.node_type.as_str())
                .filter(|t| !t.is_empty())
                .unwrap_or("Unknown")
        );

        if let Some(bounds) = node.and_then(|n| n.absolute_bounding_box) {
            let _ = writeln!(
                content,
                "**Size:** {} × {}",
                bounds.width.round(),
                bounds.height.round()
            );
        }

        match url {
            Some(url) => {
                let _ = write!(
                    content,
                    "**Download URL:** [{name}.{extension}]({url})\n\n\
                     > **Note:** Download URLs are temporary and expire after a short time. Save the assets immediately.\n\n"
                );
            }
            None => content.push_str("**Status:** Export failed for this asset\n\n"),
        }

        content.push_str("---\n\n");
    }

    let successful = rendered.iter().filter(|(_, url)| url.is_some()).count();
    let _ = write!(
        content,
        "## Usage Instructions\n\n\
         1. **Download immediately:** The URLs above are temporary and will expire\n\
         2. **Save locally:** Right-click the download links and save the files\n\
         3. **Batch download:** Use a download manager for multiple assets\n\
         4. **File naming:** Use the suggested filenames for consistency\n\n\
         ## Export Details\n\n\
         - **Total assets processed:** {}\n\
         - **Successful exports:** {}\n\
         - **Failed exports:** {}\n",
        ids.len(),
        successful,
        rendered.len() - successful
    );

    content
}
