//! Document content and metadata tools.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::document_url;
use crate::core::error::Result;
use crate::core::upstream::{GoogleDocsClient, extract_document_id};
use crate::domains::docs::{ContentFormat, Dimension, Document, extract_content};
use crate::domains::tools::handlers::ToolDefinition;

const METADATA_FIELDS: &str = "title,documentId,revisionId,documentStyle";

// =============================================================================
// get_google_doc
// =============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetGoogleDocParams {
    #[schemars(description = "Google Docs document ID or URL")]
    pub document_id: String,

    #[schemars(description = "Output format for the document content")]
    #[serde(default)]
    pub format: ContentFormat,
}

pub struct GetGoogleDocTool {
    client: Arc<GoogleDocsClient>,
}

impl GetGoogleDocTool {
    pub fn new(client: Arc<GoogleDocsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for GetGoogleDocTool {
    const NAME: &'static str = "get_google_doc";
    const DESCRIPTION: &'static str =
        "Get the content of a Google Doc as plain text, markdown or a structured outline";
    type Params = GetGoogleDocParams;

    async fn execute(&self, params: GetGoogleDocParams) -> Result<String> {
        let document_id = extract_document_id(&params.document_id)?;
        let document: Document = self
            .client
            .request(&format!("/documents/{document_id}"), &[])
            .await?;
        Ok(format_document(&document_id, &document, params.format))
    }
}

pub fn format_document(document_id: &str, document: &Document, format: ContentFormat) -> String {
    format!(
        "# {title}\n\n\
         **Document ID:** {document_id}\n\
         **Revision:** {revision}\n\
         **URL:** {url}\n\n\
         ## Content\n\n\
         {content}",
        title = document.title_or_default(),
        revision = document.revision_id.as_deref().unwrap_or("Unknown"),
        url = document_url(document_id),
        content = extract_content(document, format),
    )
}

// =============================================================================
// get_google_doc_metadata
// =============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetGoogleDocMetadataParams {
    #[schemars(description = "Google Docs document ID or URL")]
    pub document_id: String,
}

pub struct GetGoogleDocMetadataTool {
    client: Arc<GoogleDocsClient>,
}

impl GetGoogleDocMetadataTool {
    pub fn new(client: Arc<GoogleDocsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for GetGoogleDocMetadataTool {
    const NAME: &'static str = "get_google_doc_metadata";
    const DESCRIPTION: &'static str = "Get metadata about a Google Doc";
    type Params = GetGoogleDocMetadataParams;

    async fn execute(&self, params: GetGoogleDocMetadataParams) -> Result<String> {
        let document_id = extract_document_id(&params.document_id)?;
        let document: Document = self
            .client
            .request(
                &format!("/documents/{document_id}"),
                &[("fields", METADATA_FIELDS.to_string())],
            )
            .await?;
        Ok(format_metadata(&document_id, &document))
    }
}

fn magnitude(dimension: Option<&Dimension>) -> Option<f64> {
    dimension.and_then(|d| d.magnitude)
}

pub fn format_metadata(document_id: &str, document: &Document) -> String {
    let style = document.document_style.as_ref();
    let page_size = style.and_then(|s| s.page_size.as_ref());
    let width = page_size.and_then(|p| p.width.as_ref());
    let height = page_size.and_then(|p| p.height.as_ref());

    let size = match (magnitude(width), magnitude(height)) {
        (None, None) => "Unknown".to_string(),
        (w, h) => {
            let side = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_else(|| "Unknown".into());
            let unit = width.and_then(|w| w.unit.as_deref()).unwrap_or("");
            format!("{} x {} {unit}", side(w), side(h)).trim_end().to_string()
        }
    };
    let top = magnitude(style.and_then(|s| s.margin_top.as_ref())).unwrap_or(0.0);
    let bottom = magnitude(style.and_then(|s| s.margin_bottom.as_ref())).unwrap_or(0.0);

    format!(
        "# Document Metadata\n\n\
         **Title:** {title}\n\
         **Document ID:** {document_id}\n\
         **Revision ID:** {revision}\n\
         **URL:** {url}\n\n\
         ## Document Style\n\
         - **Page Size:** {size}\n\
         - **Margins:** Top: {top}, Bottom: {bottom}\n\n\
         ## Properties\n\
         - **Document Type:** Google Docs\n\
         - **Access:** Read-only via API",
        title = document.title_or_default(),
        revision = document.revision_id.as_deref().unwrap_or("Unknown"),
        url = document_url(document_id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Document {
        serde_json::from_value(json!({
            "documentId": "doc-1",
            "title": "Roadmap",
            "revisionId": "ALm37BV",
            "documentStyle": {
                "pageSize": {
                    "width": {"magnitude": 612, "unit": "PT"},
                    "height": {"magnitude": 792, "unit": "PT"}
                },
                "marginTop": {"magnitude": 72, "unit": "PT"},
                "marginBottom": {"magnitude": 54.5, "unit": "PT"}
            },
            "body": {"content": [
                {"paragraph": {"elements": [{"textRun": {"content": "Hello\n"}}]}}
            ]}
        }))
        .unwrap()
    }

    #[test]
    fn test_format_document() {
        let text = format_document("doc-1", &document(), ContentFormat::Plain);
        assert_eq!(
            text,
            "# Roadmap\n\n\
             **Document ID:** doc-1\n\
             **Revision:** ALm37BV\n\
             **URL:** https://docs.google.com/document/d/doc-1/\n\n\
             ## Content\n\n\
             Hello"
        );
    }

    #[test]
    fn test_format_document_without_body() {
        let text = format_document("doc-2", &Document::default(), ContentFormat::Structured);
        assert!(text.starts_with("# Untitled Document\n\n"));
        assert!(text.contains("**Revision:** Unknown"));
        assert!(text.ends_with("## Content\n\nDocument appears to be empty."));
    }

    #[test]
    fn test_format_metadata() {
        let text = format_metadata("doc-1", &document());
        assert!(text.starts_with("# Document Metadata\n\n**Title:** Roadmap\n**Document ID:** doc-1\n**Revision ID:** ALm37BV\n"));
        assert!(text.contains("- **Page Size:** 612 x 792 PT\n- **Margins:** Top: 72, Bottom: 54.5"));
        assert!(text.ends_with("- **Document Type:** Google Docs\n- **Access:** Read-only via API"));
    }

    #[test]
    fn test_format_metadata_without_style() {
        let text = format_metadata("doc-1", &Document::default());
        assert!(text.contains("- **Page Size:** Unknown\n- **Margins:** Top: 0, Bottom: 0"));
    }

    #[test]
    fn test_format_defaults_to_structured() {
        let params: GetGoogleDocParams = serde_json::from_value(json!({"document_id": "x"})).unwrap();
        assert_eq!(params.format, ContentFormat::Structured);
    }
}
