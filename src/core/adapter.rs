//! The three adapters and their startup wiring.
//!
//! Startup builds the upstream provider, initializes it, and hands it to the
//! tool set of that adapter. A provider that fails to initialize aborts the
//! adapter before it starts serving.

use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use tracing::info;

use super::config::Config;
use super::error::Result;
use super::rate_limiter::RateLimiter;
use super::upstream::{FigmaClient, GitHubClient, GoogleDocsClient};
use crate::domains::tools::ToolRegistry;
use crate::domains::tools::definitions::{figma_tools, github_tools, google_tools};

/// Upstream service an adapter process fronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Adapter {
    Figma,
    Github,
    GoogleWorkspace,
}

impl Adapter {
    /// Default name reported in the MCP handshake.
    pub fn server_name(&self) -> &'static str {
        match self {
            Self::Figma => "figma-mcp-server",
            Self::Github => "github-mcp-server",
            Self::GoogleWorkspace => "google-workspace-mcp-server",
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            Self::Figma => {
                "Read-only access to Figma files: structure, comments, layer search, \
                 components, design tokens and rendered asset export. File arguments \
                 accept a file key or any figma.com file/design/proto URL."
            }
            Self::Github => {
                "Read-only access to GitHub issues and pull requests: fetch one, list \
                 by state, or search within a repository."
            }
            Self::GoogleWorkspace => {
                "Read-only access to Google Docs: document content as plain text, \
                 markdown or an outline, metadata, and in-document search. Document \
                 arguments accept an ID or a docs.google.com URL."
            }
        }
    }

    /// Construct and initialize the provider, then register this adapter's tools.
    pub async fn build_registry(&self, config: &Config) -> Result<ToolRegistry> {
        let (handlers, rate_limit) = match self {
            Self::Figma => {
                let client = FigmaClient::new(&config.figma, &config.upstream)?;
                client.initialize().await?;
                (figma_tools(Arc::new(client)), config.figma.rate_limit)
            }
            Self::Github => {
                let client = GitHubClient::new(&config.github, &config.upstream)?;
                client.initialize().await?;
                (github_tools(Arc::new(client)), config.github.rate_limit)
            }
            Self::GoogleWorkspace => {
                let client = GoogleDocsClient::new(&config.google, &config.upstream)?;
                client.initialize().await?;
                (google_tools(Arc::new(client)), config.google.rate_limit)
            }
        };

        let registry = ToolRegistry::new(handlers, RateLimiter::per_minute(rate_limit))?;
        info!(
            "{}: {} tools registered, {} requests per minute",
            self,
            registry.tool_names().len(),
            rate_limit
        );
        Ok(registry)
    }
}

impl fmt::Display for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Figma => "figma",
            Self::Github => "github",
            Self::GoogleWorkspace => "google-workspace",
        };
        f.write_str(name)
    }
}
