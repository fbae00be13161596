//! GitHub REST response shapes read by the tools.

use serde::Deserialize;

use crate::domains::lenient;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "lenient::string")]
    pub login: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Label {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
}

/// An issue, as returned by the issues and search endpoints. Pull requests
/// show up there too, marked by `pull_request`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub number: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::option")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub user: Option<User>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub html_url: String,
    #[serde(default, deserialize_with = "lenient::option")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub labels: Vec<Label>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub comments: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref", default, deserialize_with = "lenient::string")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub number: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::option")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub user: Option<User>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub html_url: String,
    #[serde(default, deserialize_with = "lenient::option")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub base: Option<BranchRef>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub head: Option<BranchRef>,

    // Only the single-PR endpoint fills these.
    #[serde(default, deserialize_with = "lenient::option")]
    pub mergeable: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub draft: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub comments: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub review_comments: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub commits: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub additions: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub deletions: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub changed_files: Option<u64>,
}

impl PullRequest {
    /// `base ← head` branch line.
    pub fn branches(&self) -> String {
        let name = |branch: &Option<BranchRef>| {
            branch
                .as_ref()
                .map(|b| b.name.clone())
                .unwrap_or_else(|| "unknown".to_string())
        };
        format!("**Base:** {} ← **Head:** {}", name(&self.base), name(&self.head))
    }
}

/// `GET /search/issues`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub items: Vec<Issue>,
}

/// Login of the author, `ghost` for deleted accounts.
pub fn author(user: &Option<User>) -> &str {
    user.as_ref()
        .map(|u| u.login.as_str())
        .filter(|login| !login.is_empty())
        .unwrap_or("ghost")
}
