//! Tool definitions, one submodule per upstream.

pub mod common;
pub mod figma;
pub mod github;
pub mod google;

pub use figma::figma_tools;
pub use github::github_tools;
pub use google::google_tools;
