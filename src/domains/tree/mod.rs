//! Tree query engine for design documents.
//!
//! - `node.rs` - typed node, paint and effect model
//! - `query.rs` - type filter, text search, flatten
//! - `render.rs` - depth-limited structure outline

mod node;
mod query;
mod render;

pub use node::{
    BoundingBox, Color, Effect, EffectKind, Node, NodeType, Paint, PaintKind, Shadow, TypeStyle,
    Vector,
};
pub use query::{SearchOptions, SearchResult, filter_by_type, flatten, search};
pub use render::{render_structure, truncate};
