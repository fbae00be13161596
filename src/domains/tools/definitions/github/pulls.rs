//! Pull request tools.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::model::{PullRequest, author};
use super::{BODY_PREVIEW_LEN, StateFilter, repo_slug};
use crate::core::error::Result;
use crate::core::upstream::GitHubClient;
use crate::domains::tools::definitions::common::{
    body_preview, clamp_per_page, date_or_unknown, default_page, default_per_page,
};
use crate::domains::tools::handlers::ToolDefinition;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetGithubPrParams {
    #[schemars(description = "Repository owner")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Pull request number")]
    pub pr_number: u64,
}

pub struct GetGithubPrTool {
    client: Arc<GitHubClient>,
}

impl GetGithubPrTool {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for GetGithubPrTool {
    const NAME: &'static str = "get_github_pr";
    const DESCRIPTION: &'static str = "Get details of a specific GitHub pull request";
    type Params = GetGithubPrParams;

    async fn execute(&self, params: GetGithubPrParams) -> Result<String> {
        let slug = repo_slug(&params.owner, &params.repo)?;
        let pr: PullRequest = self
            .client
            .request(&format!("/repos/{slug}/pulls/{}", params.pr_number), &[])
            .await?;
        Ok(format_pull_request(&pr))
    }
}

pub fn format_pull_request(pr: &PullRequest) -> String {
    let mergeable = match pr.mergeable {
        Some(value) => value.to_string(),
        None => "unknown".to_string(),
    };

    format!(
        "# Pull Request #{number}: {title}\n\n\
         **State:** {state}\n\
         **Created:** {created}\n\
         **Updated:** {updated}\n\
         **Author:** {author}\n\
         **URL:** {url}\n\
         {branches}\n\n\
         ## Description\n\
         {body}\n\n\
         ## Status\n\
         - **Mergeable:** {mergeable}\n\
         - **Draft:** {draft}\n\
         - **Comments:** {comments}\n\
         - **Review Comments:** {review_comments}\n\
         - **Commits:** {commits}\n\
         - **Additions:** +{additions}\n\
         - **Deletions:** -{deletions}\n\
         - **Changed Files:** {changed_files}",
        number = pr.number,
        title = pr.title,
        state = pr.state,
        created = date_or_unknown(pr.created_at.as_deref()),
        updated = date_or_unknown(pr.updated_at.as_deref()),
        author = author(&pr.user),
        url = pr.html_url,
        branches = pr.branches(),
        body = pr
            .body
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or("No description provided."),
        draft = pr.draft.unwrap_or(false),
        comments = pr.comments.unwrap_or(0),
        review_comments = pr.review_comments.unwrap_or(0),
        commits = pr.commits.unwrap_or(0),
        additions = pr.additions.unwrap_or(0),
        deletions = pr.deletions.unwrap_or(0),
        changed_files = pr.changed_files.unwrap_or(0),
    )
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListGithubPrsParams {
    #[schemars(description = "Repository owner")]
    pub owner: String,

    #[schemars(description = "Repository name")]
    pub repo: String,

    #[schemars(description = "Pull request state filter")]
    #[serde(default)]
    pub state: StateFilter,

    #[schemars(description = "Number of pull requests per page (max 100)")]
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[schemars(description = "Page number")]
    #[serde(default = "default_page")]
    pub page: u32,
}

pub struct ListGithubPrsTool {
    client: Arc<GitHubClient>,
}

impl ListGithubPrsTool {
    pub fn new(client: Arc<GitHubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolDefinition for ListGithubPrsTool {
    const NAME: &'static str = "list_github_prs";
    const DESCRIPTION: &'static str = "List pull requests from a GitHub repository";
    type Params = ListGithubPrsParams;

    async fn execute(&self, params: ListGithubPrsParams) -> Result<String> {
        let slug = repo_slug(&params.owner, &params.repo)?;
        let prs: Vec<PullRequest> = self
            .client
            .request(
                &format!("/repos/{slug}/pulls"),
                &[
                    ("state", params.state.as_str().to_string()),
                    ("per_page", clamp_per_page(params.per_page).to_string()),
                    ("page", params.page.max(1).to_string()),
                ],
            )
            .await?;
        Ok(format_pull_request_list(&slug, params.state, &prs))
    }
}

pub fn format_pull_request_list(slug: &str, state: StateFilter, prs: &[PullRequest]) -> String {
    let header = format!("# Pull Requests for {slug} ({})\n\n", state.as_str());
    if prs.is_empty() {
        return format!("{header}No pull requests found.");
    }

    let entries: Vec<String> = prs
        .iter()
        .map(|pr| {
            format!(
                "## #{}: {}\n**State:** {} | **Author:** {} | **Created:** {}\n{}\n**URL:** {}\n{}\n---",
                pr.number,
                pr.title,
                pr.state,
                author(&pr.user),
                date_or_unknown(pr.created_at.as_deref()),
                pr.branches(),
                pr.html_url,
                body_preview(pr.body.as_deref(), BODY_PREVIEW_LEN)
            )
        })
        .collect();
    format!("{header}{}", entries.join("\n\n"))
}
