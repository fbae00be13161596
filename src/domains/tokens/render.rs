//! Text renderings of a [`DesignTokenSet`].
//!
//! Each renderer emits only the categories that hold tokens, so filtering a
//! set with [`DesignTokenSet::retain`] first selects what gets printed.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::extract::DesignTokenSet;
use super::format::css_identifier;
use crate::domains::tree::truncate;

/// Output formats for design tokens.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum TokenFormat {
    #[default]
    Markdown,
    Css,
    Scss,
    Json,
}

const EFFECT_DETAIL_LEN: usize = 100;

/// Render `tokens` in the requested format.
pub fn render_tokens(tokens: &DesignTokenSet, format: TokenFormat) -> String {
    match format {
        TokenFormat::Markdown => render_markdown(tokens),
        TokenFormat::Css => render_css(tokens),
        TokenFormat::Scss => render_scss(tokens),
        TokenFormat::Json => render_json(tokens),
    }
}

pub fn render_json(tokens: &DesignTokenSet) -> String {
    let json = serde_json::to_string_pretty(tokens).unwrap_or_else(|_| "{}".to_string());
    format!("# Design Tokens (JSON)\n\n```json\n{json}\n```")
}

/// CSS custom properties on `:root`: colors, font sizes and spacing.
pub fn render_css(tokens: &DesignTokenSet) -> String {
    let mut css = String::from("# Design Tokens (CSS)\n\n```css\n:root {\n");

    if !tokens.colors.is_empty() {
        css.push_str("  /* Colors */\n");
        for (name, value) in &tokens.colors {
            let _ = writeln!(css, "  --color-{}: {};", css_identifier(name), value);
        }
        css.push('\n');
    }

    if !tokens.typography.is_empty() {
        css.push_str("  /* Typography - Font Sizes */\n");
        for (name, style) in &tokens.typography {
            if let Some(size) = &style.font_size {
                let _ = writeln!(css, "  --font-size-{}: {};", css_identifier(name), size);
            }
        }
        css.push('\n');
    }

    if !tokens.spacing.is_empty() {
        css.push_str("  /* Spacing */\n");
        for (name, spacing) in &tokens.spacing {
            let id = css_identifier(name);
            let _ = writeln!(css, "  --spacing-{id}-top: {}px;", spacing.top);
            let _ = writeln!(css, "  --spacing-{id}-right: {}px;", spacing.right);
            let _ = writeln!(css, "  --spacing-{id}-bottom: {}px;", spacing.bottom);
            let _ = writeln!(css, "  --spacing-{id}-left: {}px;", spacing.left);
        }
    }

    css.push_str("}\n```");
    css
}

/// SCSS variables: colors and font family / size / weight.
pub fn render_scss(tokens: &DesignTokenSet) -> String {
    let mut scss = String::from("# Design Tokens (SCSS)\n\n```scss\n");

    if !tokens.colors.is_empty() {
        scss.push_str("// Colors\n");
        for (name, value) in &tokens.colors {
            let _ = writeln!(scss, "$color-{}: {};", css_identifier(name), value);
        }
        scss.push('\n');
    }

    if !tokens.typography.is_empty() {
        scss.push_str("// Typography\n");
        for (name, style) in &tokens.typography {
            let id = css_identifier(name);
            if let Some(family) = &style.font_family {
                let _ = writeln!(scss, "$font-family-{id}: {family};");
            }
            if let Some(size) = &style.font_size {
                let _ = writeln!(scss, "$font-size-{id}: {size};");
            }
            if let Some(weight) = style.font_weight {
                let _ = writeln!(scss, "$font-weight-{id}: {weight};");
            }
        }
        scss.push('\n');
    }

    scss.push_str("```");
    scss
}

/// One markdown table per non-empty category.
pub fn render_markdown(tokens: &DesignTokenSet) -> String {
    let mut md = String::from("# Design Tokens\n\n");

    if !tokens.colors.is_empty() {
        md.push_str("## Colors\n\n| Name | Value | Preview |\n|------|-------|---------|\n");
        for (name, value) in &tokens.colors {
            let _ = writeln!(
                md,
                "| {name} | `{value}` | <span style=\"background-color: {value}; width: 20px; height: 20px; display: inline-block; border: 1px solid #ccc;\"></span> |"
            );
        }
        md.push('\n');
    }

    if !tokens.typography.is_empty() {
        md.push_str(
            "## Typography\n\n| Name | Font Family | Size | Weight | Line Height |\n\
             |------|-------------|------|--------|-------------|\n",
        );
        for (name, style) in &tokens.typography {
            let weight = style
                .font_weight
                .map(|w| w.to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} |",
                name,
                style.font_family.as_deref().unwrap_or("-"),
                style.font_size.as_deref().unwrap_or("-"),
                weight,
                style.line_height
            );
        }
        md.push('\n');
    }

    if !tokens.spacing.is_empty() {
        md.push_str("## Spacing\n\n| Name | Top | Right | Bottom | Left |\n|------|-----|-------|--------|------|\n");
        for (name, s) in &tokens.spacing {
            let _ = writeln!(
                md,
                "| {name} | {}px | {}px | {}px | {}px |",
                s.top, s.right, s.bottom, s.left
            );
        }
        md.push('\n');
    }

    if !tokens.effects.is_empty() {
        md.push_str("## Effects\n\n| Name | Type | Details |\n|------|------|---------|\n");
        for (name, effect) in &tokens.effects {
            let details = serde_json::to_string(effect).unwrap_or_default();
            let details = truncate(&details, EFFECT_DETAIL_LEN);
            let _ = writeln!(md, "| {} | {} | {} |", name, effect.kind.type_tag(), details);
        }
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tokens::{TokenCategory, extract_design_tokens};
    use crate::domains::tree::Node;
    use serde_json::json;

    fn sample() -> DesignTokenSet {
        let roots: Vec<Node> = serde_json::from_value(json!([
            {"name": "Primary Blue", "type": "RECTANGLE",
             "fills": [{"type": "SOLID", "color": {"r": 0, "g": 0.4, "b": 1}}]},
            {"name": "Heading", "type": "TEXT",
             "style": {"fontFamily": "Inter", "fontSize": 32, "fontWeight": 700, "lineHeightPx": 40}},
            {"name": "Card", "type": "FRAME", "paddingTop": 12, "paddingLeft": 16,
             "effects": [{"type": "DROP_SHADOW", "radius": 8, "color": {"r": 0, "g": 0, "b": 0, "a": 0.25}}]}
        ]))
        .unwrap();
        extract_design_tokens(&roots)
    }

    #[test]
    fn test_css_custom_properties() {
        let css = render_css(&sample());
        assert!(css.starts_with("# Design Tokens (CSS)"));
        assert!(css.contains("  --color-primary-blue: #0066ff;"));
        assert!(css.contains("  --font-size-heading: 32px;"));
        assert!(css.contains("  --spacing-card-top: 12px;"));
        assert!(css.contains("  --spacing-card-right: 0px;"));
        assert!(css.trim_end().ends_with("}\n```"));
    }

    #[test]
    fn test_scss_variables() {
        let scss = render_scss(&sample());
        assert!(scss.contains("$color-primary-blue: #0066ff;"));
        assert!(scss.contains("$font-family-heading: Inter;"));
        assert!(scss.contains("$font-weight-heading: 700;"));
        assert!(!scss.contains("spacing"));
    }

    #[test]
    fn test_markdown_tables() {
        let md = render_markdown(&sample());
        assert!(md.contains("## Colors"));
        assert!(md.contains("| Primary Blue | `#0066ff` |"));
        assert!(md.contains("| Heading | Inter | 32px | 700 | 40px |"));
        assert!(md.contains("| Card | 12px | 0px | 0px | 16px |"));
        assert!(md.contains("| Card-effect-0 | DROP_SHADOW |"));
    }

    #[test]
    fn test_markdown_skips_unrequested_categories() {
        let tokens = sample().retain(&[TokenCategory::Colors]);
        let md = render_tokens(&tokens, TokenFormat::Markdown);
        assert!(md.contains("## Colors"));
        assert!(!md.contains("## Typography"));
        assert!(!md.contains("## Effects"));
    }

    #[test]
    fn test_json_only_holds_present_categories() {
        let tokens = sample().retain(&[TokenCategory::Colors, TokenCategory::Effects]);
        let rendered = render_json(&tokens);
        let body = rendered
            .trim_start_matches("# Design Tokens (JSON)\n\n```json\n")
            .trim_end_matches("\n```");
        let value: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(value["colors"]["Primary Blue"], "#0066ff");
        assert_eq!(value["effects"]["Card-effect-0"]["type"], "DROP_SHADOW");
        assert!(value.get("typography").is_none());
    }

    #[test]
    fn test_format_parses_lowercase() {
        let format: TokenFormat = serde_json::from_value(json!("scss")).unwrap();
        assert_eq!(format, TokenFormat::Scss);
    }
}
