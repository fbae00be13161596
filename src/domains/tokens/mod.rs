//! Design tokens: extraction from node trees, value formatters and renderers.

mod extract;
mod format;
mod render;

pub use extract::{DesignTokenSet, Spacing, TokenCategory, extract_design_tokens};
pub use format::{Typography, css_identifier, format_color, format_typography};
pub use render::{
    TokenFormat, render_css, render_json, render_markdown, render_scss, render_tokens,
};
