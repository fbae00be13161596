//! Repository-scoped issue and pull request search.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::model::{SearchResponse, author};
use super::{BODY_PREVIEW_LEN, repo_slug};
use crate::core::error::{Error, Result};
use crate::core::upstream::GitHubClient;
use crate::domains::tools::definitions::common::{
    body_preview, clamp_per_page, date_or_unknown, default_per_page,
};
use crate::domains::tools::handlers::ToolDefinition;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Issue,
    Pr,
    #[default]
    Both,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchGithubIssuesParams {
    #[schemars(description = "Repository owner")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Search query")]
    pub query: String,

    #[schemars(description = "Type of items to search")]
    #[serde(rename = "type", default)]
    pub kind: SearchKind,

    #[schemars(description = "Number of results per page (max 100)")]
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// GitHub search syntax for a query scoped to one repository.
pub fn build_query(slug: &str, query: &str, kind: SearchKind) -> String {
    let mut q = format!("repo:{slug} {query}");
    match kind {
        SearchKind::Issue => q.push_str(" is:issue"),
        SearchKind::Pr => q.push_str(" is:pr"),
        SearchKind::Both => {}
    }
    q
}

pub struct SearchGithubIssuesTool {
    client: Arc<GitHubClient>,
}

impl SearchGithubIssuesTool {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for SearchGithubIssuesTool {
    const NAME: &'static str = "search_github_issues";
    const DESCRIPTION: &'static str = "Search issues and PRs in a GitHub repository";
    type Params = SearchGithubIssuesParams;

    async fn execute(&self, params: SearchGithubIssuesParams) -> Result<String> {
        let slug = repo_slug(&params.owner, &params.repo)?;
        if params.query.trim().is_empty() {
            return Err(Error::validation("query is required"));
        }

        let response: SearchResponse = self
            .client
            .request(
                "/search/issues",
                &[
                    ("q", build_query(&slug, &params.query, params.kind)),
                    ("per_page", clamp_per_page(params.per_page).to_string()),
                ],
            )
            .await?;
        Ok(format_search(&slug, &params.query, &response))
    }
}

pub fn format_search(slug: &str, query: &str, response: &SearchResponse) -> String {
    let header = format!(
        "# Search Results for \"{query}\" in {slug}\n\nFound {} total results (showing {})\n\n",
        response.total_count,
        response.items.len()
    );
    if response.items.is_empty() {
        return format!("{header}No matching issues or pull requests found.");
    }

    let entries: Vec<String> = response
        .items
        .iter()
        .map(|item| {
            format!(
                "## #{}: {}\n**Type:** {} | **State:** {} | **Author:** {}\n**Created:** {}\n**URL:** {}\n{}\n---",
                item.number,
                item.title,
                if item.is_pull_request() { "Pull Request" } else { "Issue" },
                item.state,
                author(&item.user),
                date_or_unknown(item.created_at.as_deref()),
                item.html_url,
                body_preview(item.body.as_deref(), BODY_PREVIEW_LEN)
            )
        })
        .collect();
    format!("{header}{}", entries.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_query() {
        assert_eq!(build_query("o/r", "crash", SearchKind::Both), "repo:o/r crash");
        assert_eq!(build_query("o/r", "crash", SearchKind::Issue), "repo:o/r crash is:issue");
        assert_eq!(build_query("o/r", "crash", SearchKind::Pr), "repo:o/r crash is:pr");
    }

    #[test]
    fn test_type_param_name() {
        let params: SearchGithubIssuesParams = serde_json::from_value(json!({
            "owner": "o", "repo": "r", "query": "q", "type": "pr"
        }))
        .unwrap();
        assert_eq!(params.kind, SearchKind::Pr);
        assert_eq!(params.per_page, 30);
    }

    #[test]
    fn test_format_search() {
        let response: SearchResponse = serde_json::from_value(json!({
            "total_count": 57,
            "items": [
                {"number": 1, "title": "Bug", "state": "open", "user": {"login": "a"},
                 "created_at": "2024-01-02T00:00:00Z", "html_url": "u1", "body": "details"},
                {"number": 2, "title": "Fix", "state": "closed", "user": {"login": "b"},
                 "html_url": "u2", "pull_request": {"url": "x"}}
            ]
        }))
        .unwrap();
        let text = format_search("o/r", "crash", &response);
        assert!(text.starts_with("# Search Results for \"crash\" in o/r\n\nFound 57 total results (showing 2)\n\n"));
        assert!(text.contains("## #1: Bug\n**Type:** Issue | **State:** open | **Author:** a\n**Created:** 1/2/2024\n**URL:** u1\ndetails\n---"));
        assert!(text.contains("**Type:** Pull Request | **State:** closed"));
        assert!(text.ends_with("No description\n---"));
    }
}
