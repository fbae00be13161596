//! Google Docs tools.

pub mod documents;
pub mod search;

use std::sync::Arc;

pub use documents::{
    GetGoogleDocMetadataParams, GetGoogleDocMetadataTool, GetGoogleDocParams, GetGoogleDocTool,
};
pub use search::{SearchGoogleDocParams, SearchGoogleDocTool};

use crate::core::upstream::GoogleDocsClient;
use crate::domains::tools::handlers::ToolHandler;

/// Browser URL of a document.
pub fn document_url(document_id: &str) -> String {
    format!("https://docs.google.com/document/d/{document_id}/")
}

/// Every Google Docs tool, sharing one client.
pub fn google_tools(client: Arc<GoogleDocsClient>) -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(GetGoogleDocTool::new(client.clone())),
        Arc::new(GetGoogleDocMetadataTool::new(client.clone())),
        Arc::new(SearchGoogleDocTool::new(client)),
    ]
}
