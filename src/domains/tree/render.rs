//! Depth-limited outline of a node forest.

use std::fmt::Write;

use super::node::Node;

/// Characters of text content shown per node.
const TEXT_PREVIEW_LEN: usize = 50;

/// Render one markdown bullet per node, two spaces of indent per level.
///
/// Nodes at depth `max_depth` and below are not printed; `max_depth == 1`
/// prints only the roots.
pub fn render_structure(roots: &[Node], max_depth: usize) -> String {
    let mut out = String::new();
    render_level(roots, max_depth, 0, &mut out);
    out
}

fn render_level(nodes: &[Node], max_depth: usize, depth: usize, out: &mut String) {
    if depth >= max_depth {
        return;
    }

    let indent = "  ".repeat(depth);
    for node in nodes {
        let _ = write!(out, "{indent}- **{}** ({})", node.label(), node.node_type);

        if let Some(bounds) = &node.absolute_bounding_box {
            let _ = write!(
                out,
                " - {}×{}",
                bounds.width.round(),
                bounds.height.round()
            );
        }

        if let Some(text) = &node.characters {
            let _ = write!(out, " - \"{}\"", truncate(text, TEXT_PREVIEW_LEN));
        }

        out.push('\n');
        render_level(&node.children, max_depth, depth + 1, out);
    }
}

/// First `max` characters of `text`, with `...` appended when cut.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn three_levels() -> Vec<Node> {
        serde_json::from_value(json!([
            {"name": "Page", "type": "CANVAS", "children": [
                {"name": "Hero", "type": "FRAME",
                 "absoluteBoundingBox": {"x": 0, "y": 0, "width": 1440.4, "height": 719.6},
                 "children": [
                    {"name": "Headline", "type": "TEXT", "characters": "Welcome"}
                 ]}
            ]}
        ]))
        .unwrap()
    }

    #[test]
    fn test_depth_one_prints_roots_only() {
        let out = render_structure(&three_levels(), 1);
        assert_eq!(out, "- **Page** (CANVAS)\n");
    }

    #[test]
    fn test_full_depth() {
        let out = render_structure(&three_levels(), 3);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "  - **Hero** (FRAME) - 1440×720");
        assert_eq!(lines[2], "    - **Headline** (TEXT) - \"Welcome\"");
    }

    #[test]
    fn test_zero_depth_is_empty() {
        assert!(render_structure(&three_levels(), 0).is_empty());
    }

    #[test]
    fn test_long_text_is_truncated() {
        let text = "x".repeat(60);
        let roots: Vec<Node> =
            serde_json::from_value(json!([{"type": "TEXT", "characters": text}])).unwrap();
        let out = render_structure(&roots, 1);
        assert!(out.contains(&format!("\"{}...\"", "x".repeat(50))));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("héllo", 2), "hé...");
        assert_eq!(truncate("héllo", 5), "héllo");
    }
}
