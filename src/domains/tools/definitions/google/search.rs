//! Case-insensitive search inside one document.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use crate::core::error::{Error, Result};
use crate::core::upstream::{GoogleDocsClient, extract_document_id};
use crate::domains::docs::{ContentFormat, Document, LineMatch, extract_content, search_lines};
use crate::domains::tools::handlers::ToolDefinition;

fn default_context_lines() -> usize {
    2
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchGoogleDocParams {
    #[schemars(description = "Google Docs document ID or URL")]
    pub document_id: String,

    #[schemars(description = "Text to search for (case-insensitive)")]
    pub search_text: String,

    #[schemars(description = "Number of lines of context around each match")]
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,
}

pub struct SearchGoogleDocTool {
    client: Arc<GoogleDocsClient>,
}

impl SearchGoogleDocTool {
    pub fn new(client: Arc<GoogleDocsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for SearchGoogleDocTool {
    const NAME: &'static str = "search_google_doc";
    const DESCRIPTION: &'static str = "Search for text within a Google Doc";
    type Params = SearchGoogleDocParams;

    async fn execute(&self, params: SearchGoogleDocParams) -> Result<String> {
        if params.search_text.is_empty() {
            return Err(Error::validation("search_text is required"));
        }
        let document_id = extract_document_id(&params.document_id)?;
        let document: Document = self
            .client
            .request(&format!("/documents/{document_id}"), &[])
            .await?;

        let text = extract_content(&document, ContentFormat::Plain);
        let matches = search_lines(&text, &params.search_text, params.context_lines);
        debug!("{} matches for {:?} in {}", matches.len(), params.search_text, document_id);
        Ok(format_matches(&document_id, &document, &params.search_text, &matches))
    }
}

pub fn format_matches(
    document_id: &str,
    document: &Document,
    search_text: &str,
    matches: &[LineMatch],
) -> String {
    let header = format!(
        "# Search Results for \"{search_text}\"\n\n\
         **Document:** {}\n\
         **Document ID:** {document_id}\n",
        document.title_or_default()
    );
    if matches.is_empty() {
        return format!("{header}\nNo matches found for \"{search_text}\".");
    }

    let results: Vec<String> = matches
        .iter()
        .enumerate()
        .map(|(index, m)| {
            format!(
                "## Match {} (Line {})\n\n```\n{}\n```\n\n**Matching line:** {}\n\n---",
                index + 1,
                m.line_number,
                m.context,
                m.line
            )
        })
        .collect();

    format!(
        "{header}**Matches Found:** {}\n\n{}",
        matches.len(),
        results.join("\n\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Document {
        serde_json::from_value(json!({
            "title": "Notes",
            "body": {"content": [
                {"paragraph": {"elements": [{"textRun": {"content": "Budget review\n"}}]}},
                {"paragraph": {"elements": [{"textRun": {"content": "Hiring plan\n"}}]}},
                {"paragraph": {"elements": [{"textRun": {"content": "Budget sign-off\n"}}]}}
            ]}
        }))
        .unwrap()
    }

    #[test]
    fn test_format_matches() {
        let doc = document();
        let text = extract_content(&doc, ContentFormat::Plain);
        let matches = search_lines(&text, "budget", 0);
        let out = format_matches("doc-1", &doc, "budget", &matches);
        assert_eq!(
            out,
            "# Search Results for \"budget\"\n\n\
             **Document:** Notes\n\
             **Document ID:** doc-1\n\
             **Matches Found:** 2\n\n\
             ## Match 1 (Line 1)\n\n```\nBudget review\n```\n\n**Matching line:** Budget review\n\n---\n\n\
             ## Match 2 (Line 5)\n\n```\nBudget sign-off\n```\n\n**Matching line:** Budget sign-off\n\n---"
        );
    }

    #[test]
    fn test_format_no_matches() {
        let out = format_matches("doc-1", &document(), "travel", &[]);
        assert_eq!(
            out,
            "# Search Results for \"travel\"\n\n\
             **Document:** Notes\n\
             **Document ID:** doc-1\n\n\
             No matches found for \"travel\"."
        );
    }

    #[test]
    fn test_context_lines_default() {
        let params: SearchGoogleDocParams =
            serde_json::from_value(json!({"document_id": "x", "search_text": "y"})).unwrap();
        assert_eq!(params.context_lines, 2);
    }
}
