//! GitHub tools: issues, pull requests and repository search.

pub mod issues;
pub mod model;
pub mod pulls;
pub mod search;

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use issues::{GetGithubIssueTool, ListGithubIssuesTool};
pub use pulls::{GetGithubPrTool, ListGithubPrsTool};
pub use search::SearchGithubIssuesTool;

use crate::core::error::{Error, Result};
use crate::core::upstream::GitHubClient;
use crate::domains::tools::handlers::ToolHandler;

/// Characters of body text shown per listing entry.
pub const BODY_PREVIEW_LEN: usize = 200;

/// Issue / pull request state filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl StateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

/// `owner/repo`, rejecting blank parts.
pub fn repo_slug(owner: &str, repo: &str) -> Result<String> {
    let (owner, repo) = (owner.trim(), repo.trim());
    if owner.is_empty() || repo.is_empty() {
        return Err(Error::validation("owner and repo are required"));
    }
    Ok(format!("{owner}/{repo}"))
}

/// Every GitHub tool, sharing one client.
pub fn github_tools(client: Arc<GitHubClient>) -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(GetGithubIssueTool::new(client.clone())),
        Arc::new(GetGithubPrTool::new(client.clone())),
        Arc::new(ListGithubIssuesTool::new(client.clone())),
        Arc::new(ListGithubPrsTool::new(client.clone())),
        Arc::new(SearchGithubIssuesTool::new(client)),
    ]
}
