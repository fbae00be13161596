//! Figma REST response shapes read by the tools.

use std::collections::HashMap;

use serde::Deserialize;

use crate::domains::lenient;
use crate::domains::tree::{Node, Vector};

/// `GET /files/{key}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaFile {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::option")]
    pub last_modified: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub thumbnail_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub editor_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub document: Option<Node>,
}

impl FigmaFile {
    /// Top-level canvases of the document.
    pub fn pages(&self) -> &[Node] {
        self.document
            .as_ref()
            .map(|document| document.children.as_slice())
            .unwrap_or_default()
    }
}

/// `GET /files/{key}/comments`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentsResponse {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient::option")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub user: Option<CommentUser>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub client_meta: Option<ClientMeta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentUser {
    #[serde(default, deserialize_with = "lenient::option")]
    pub handle: Option<String>,
}

/// Where a comment is pinned.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientMeta {
    #[serde(default, deserialize_with = "lenient::option")]
    pub node_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub node_offset: Option<Vector>,
}

/// `GET /images/{key}`: node id → rendered image URL (null when it failed).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagesResponse {
    #[serde(default, deserialize_with = "lenient::option")]
    pub images: Option<HashMap<String, Option<String>>>,
}

/// `GET /files/{key}/nodes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodesResponse {
    #[serde(default, deserialize_with = "lenient::option")]
    pub nodes: Option<HashMap<String, Option<NodeEntry>>>,
}

impl NodesResponse {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.as_ref()?.get(id)?.as_ref()?.document.as_ref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeEntry {
    #[serde(default, deserialize_with = "lenient::option")]
    pub document: Option<Node>,
}
