//! Domains module containing the business logic of the adapters.
//!
//! - **tree**: Figma node model and the read-only query engine over it
//! - **tokens**: design token extraction, formatting and rendering
//! - **docs**: Google Docs content model, text extraction and search
//! - **tools**: the MCP tools of every adapter and their registry

pub mod docs;
pub mod lenient;
pub mod tokens;
pub mod tools;
pub mod tree;
