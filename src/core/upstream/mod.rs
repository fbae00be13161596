//! Upstream REST providers.
//!
//! Each adapter talks to exactly one upstream API through a provider that
//! owns its credential, knows how to authenticate a request and how to read
//! the upstream's error bodies. Providers are constructed once at startup,
//! initialized before the server accepts requests, and shared with every
//! tool handler through an `Arc`.

mod client;
pub mod figma;
pub mod github;
pub mod google;
pub mod ids;

pub use client::HttpClient;
pub use figma::FigmaClient;
pub use github::GitHubClient;
pub use google::{CredentialSource, GoogleDocsClient};
pub use ids::{extract_document_id, extract_file_key};
