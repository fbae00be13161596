//! Single-issue and issue listing tools.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use super::model::{Issue, author};
use super::{BODY_PREVIEW_LEN, StateFilter, repo_slug};
use crate::core::error::Result;
use crate::core::upstream::GitHubClient;
use crate::domains::tools::definitions::common::{
    body_preview, clamp_per_page, date_or_unknown, default_page, default_per_page,
};
use crate::domains::tools::handlers::ToolDefinition;

// =============================================================================
// get_github_issue
// =============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetGithubIssueParams {
    #[schemars(description = "Repository owner")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Issue number")]
    pub issue_number: u64,
}

pub struct GetGithubIssueTool {
    client: Arc<GitHubClient>,
}

impl GetGithubIssueTool {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for GetGithubIssueTool {
    const NAME: &'static str = "get_github_issue";
    const DESCRIPTION: &'static str = "Get details of a specific GitHub issue";
    type Params = GetGithubIssueParams;

    async fn execute(&self, params: GetGithubIssueParams) -> Result<String> {
        let slug = repo_slug(&params.owner, &params.repo)?;
        let issue: Issue = self
            .client
            .request(&format!("/repos/{slug}/issues/{}", params.issue_number), &[])
            .await?;
        Ok(format_issue(&issue))
    }
}

pub fn format_issue(issue: &Issue) -> String {
    let labels = if issue.labels.is_empty() {
        "No labels".to_string()
    } else {
        issue
            .labels
            .iter()
            .map(|label| format!("- {}", label.name))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "# Issue #{number}: {title}\n\n\
         **State:** {state}\n\
         **Created:** {created}\n\
         **Updated:** {updated}\n\
         **Author:** {author}\n\
         **URL:** {url}\n\n\
         ## Description\n\
         {body}\n\n\
         ## Labels\n\
         {labels}\n\n\
         ## Comments\n\
         {comments} comment(s)",
        number = issue.number,
        title = issue.title,
        state = issue.state,
        created = date_or_unknown(issue.created_at.as_deref()),
        updated = date_or_unknown(issue.updated_at.as_deref()),
        author = author(&issue.user),
        url = issue.html_url,
        body = issue
            .body
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or("No description provided."),
        comments = issue.comments.unwrap_or(0),
    )
}

// =============================================================================
// list_github_issues
// =============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListGithubIssuesParams {
    #[schemars(description = "Repository owner")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Issue state filter")]
    #[serde(default)]
    pub state: StateFilter,

    #[schemars(description = "Number of issues per page (max 100)")]
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[schemars(description = "Page number")]
    #[serde(default = "default_page")]
    pub page: u32,
}

pub struct ListGithubIssuesTool {
    client: Arc<GitHubClient>,
}

impl ListGithubIssuesTool {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for ListGithubIssuesTool {
    const NAME: &'static str = "list_github_issues";
    const DESCRIPTION: &'static str = "List issues from a GitHub repository";
    type Params = ListGithubIssuesParams;

    async fn execute(&self, params: ListGithubIssuesParams) -> Result<String> {
        let slug = repo_slug(&params.owner, &params.repo)?;
        let items: Vec<Issue> = self
            .client
            .request(
                &format!("/repos/{slug}/issues"),
                &[
                    ("state", params.state.as_str().to_string()),
                    ("per_page", clamp_per_page(params.per_page).to_string()),
                    ("page", params.page.max(1).to_string()),
                ],
            )
            .await?;

        // The issues endpoint also returns pull requests.
        let issues: Vec<Issue> = items.into_iter().filter(|i| !i.is_pull_request()).collect();
        debug!("Listed {} issues for {}", issues.len(), slug);
        Ok(format_issue_list(&slug, params.state, &issues))
    }
}

pub fn format_issue_list(slug: &str, state: StateFilter, issues: &[Issue]) -> String {
    let header = format!("# Issues for {slug} ({})\n\n", state.as_str());
    if issues.is_empty() {
        return format!("{header}No issues found.");
    }

    let entries: Vec<String> = issues
        .iter()
        .map(|issue| {
            format!(
                "## #{}: {}\n**State:** {} | **Author:** {} | **Created:** {}\n**URL:** {}\n{}\n---",
                issue.number,
                issue.title,
                issue.state,
                author(&issue.user),
                date_or_unknown(issue.created_at.as_deref()),
                issue.html_url,
                body_preview(issue.body.as_deref(), BODY_PREVIEW_LEN)
            )
        })
        .collect();
    format!("{header}{}", entries.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue() -> Issue {
        serde_json::from_value(json!({
            "number": 7,
            "title": "Crash on start",
            "state": "open",
            "created_at": "2024-02-01T10:00:00Z",
            "updated_at": "2024-02-03T10:00:00Z",
            "user": {"login": "octocat"},
            "html_url": "https://github.com/o/r/issues/7",
            "body": "Steps to reproduce",
            "labels": [{"name": "bug"}, {"name": "p1"}],
            "comments": 3
        }))
        .unwrap()
    }

    #[test]
    fn test_format_issue() {
        let text = format_issue(&issue());
        assert!(text.starts_with("# Issue #7: Crash on start\n\n**State:** open\n**Created:** 2/1/2024\n**Updated:** 2/3/2024\n**Author:** octocat\n"));
        assert!(text.contains("## Description\nSteps to reproduce\n\n## Labels\n- bug\n- p1\n\n## Comments\n3 comment(s)"));
    }

    #[test]
    fn test_format_issue_fallbacks() {
        let bare: Issue = serde_json::from_value(json!({"number": 1, "title": "t", "user": null})).unwrap();
        let text = format_issue(&bare);
        assert!(text.contains("**Author:** ghost"));
        assert!(text.contains("No description provided."));
        assert!(text.contains("## Labels\nNo labels"));
        assert!(text.contains("0 comment(s)"));
    }

    #[test]
    fn test_format_issue_list() {
        let mut long = issue();
        long.number = 8;
        long.body = Some("x".repeat(250));
        let text = format_issue_list("o/r", StateFilter::Open, &[issue(), long]);
        assert!(text.starts_with("# Issues for o/r (open)\n\n## #7: Crash on start\n**State:** open | **Author:** octocat | **Created:** 2/1/2024\n"));
        assert!(text.contains(&format!("{}...\n---", "x".repeat(200))));
        assert!(text.contains("---\n\n## #8"));

        assert_eq!(
            format_issue_list("o/r", StateFilter::Closed, &[]),
            "# Issues for o/r (closed)\n\nNo issues found."
        );
    }

    #[test]
    fn test_list_params_defaults() {
        let params: ListGithubIssuesParams =
            serde_json::from_value(json!({"owner": "o", "repo": "r"})).unwrap();
        assert_eq!(params.state, StateFilter::Open);
        assert_eq!(params.per_page, 30);
        assert_eq!(params.page, 1);
    }
}
