//! Read-only traversals over a node forest.
//!
//! All walks are pre-order: a parent before its children, siblings in the
//! order given. Results borrow from the forest.

use super::node::{Node, NodeType};

/// Which node attributes a search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub match_name: bool,
    pub match_text: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            match_name: true,
            match_text: true,
        }
    }
}

impl SearchOptions {
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

/// A matching node plus the labels from the forest root down to it.
///
/// The last path element is the match's own label.
#[derive(Debug, Clone)]
pub struct SearchResult<'a> {
    pub node: &'a Node,
    pub path: Vec<&'a str>,
}

/// Every node whose type equals `node_type`, at any depth.
pub fn filter_by_type<'a>(roots: &'a [Node], node_type: &NodeType) -> Vec<&'a Node> {
    let mut found = Vec::new();
    for root in roots {
        walk(root, &mut |node| {
            if node.is_type(node_type) {
                found.push(node);
            }
        });
    }
    found
}

/// Every node of the forest, parents before children.
pub fn flatten(roots: &[Node]) -> Vec<&Node> {
    let mut all = Vec::new();
    for root in roots {
        walk(root, &mut |node| all.push(node));
    }
    all
}

/// Substring search over node names and text content.
///
/// Nested matches are all reported, whether or not an ancestor matched.
pub fn search<'a>(roots: &'a [Node], term: &str, options: SearchOptions) -> Vec<SearchResult<'a>> {
    let term = if options.case_sensitive {
        term.to_string()
    } else {
        term.to_lowercase()
    };

    let mut results = Vec::new();
    let mut path = Vec::new();
    for root in roots {
        search_node(root, &term, &options, &mut path, &mut results);
    }
    results
}

fn search_node<'a>(
    node: &'a Node,
    term: &str,
    options: &SearchOptions,
    path: &mut Vec<&'a str>,
    results: &mut Vec<SearchResult<'a>>,
) {
    path.push(node.label());

    let contains = |haystack: &str| {
        if options.case_sensitive {
            haystack.contains(term)
        } else {
            haystack.to_lowercase().contains(term)
        }
    };

    let name_hit = options.match_name && node.name.as_deref().is_some_and(contains);
    let text_hit = options.match_text && node.characters.as_deref().is_some_and(contains);

    if name_hit || text_hit {
        results.push(SearchResult {
            node,
            path: path.clone(),
        });
    }

    for child in &node.children {
        search_node(child, term, options, path, results);
    }

    path.pop();
}

fn walk<'a, F>(node: &'a Node, visit: &mut F)
where
    F: FnMut(&'a Node),
{
    visit(node);
    for child in &node.children {
        walk(child, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn forest() -> Vec<Node> {
        serde_json::from_value(json!([
            {
                "id": "0:1", "name": "A", "type": "CANVAS",
                "children": [
                    {
                        "id": "1:1", "name": "B", "type": "FRAME",
                        "children": [
                            {"id": "1:2", "name": "C", "type": "TEXT", "characters": "Sign up"},
                            {"id": "1:3", "name": "primary button", "type": "COMPONENT",
                             "children": [
                                {"id": "1:4", "name": "Button label", "type": "TEXT", "characters": "Go"}
                             ]}
                        ]
                    },
                    {"id": "1:5", "type": "RECTANGLE"}
                ]
            },
            {"id": "0:2", "name": "Icons", "type": "CANVAS", "children": [
                {"id": "2:1", "name": "star", "type": "COMPONENT"}
            ]}
        ]))
        .unwrap()
    }

    fn ids<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Vec<&'a str> {
        nodes.into_iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_flatten_is_preorder() {
        let roots = forest();
        assert_eq!(
            ids(flatten(&roots)),
            vec!["0:1", "1:1", "1:2", "1:3", "1:4", "1:5", "0:2", "2:1"]
        );
    }

    #[test]
    fn test_filter_by_type_matches_exhaustive_walk() {
        let roots = forest();
        let components = filter_by_type(&roots, &NodeType::Component);
        assert_eq!(ids(components), vec!["1:3", "2:1"]);

        for tag in ["TEXT", "FRAME", "CANVAS", "ELLIPSE", "SOMETHING_ELSE"] {
            let node_type = NodeType::from(tag);
            let expected: Vec<_> = flatten(&roots)
                .into_iter()
                .filter(|n| n.node_type == node_type)
                .collect();
            assert_eq!(ids(filter_by_type(&roots, &node_type)), ids(expected));
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring_by_default() {
        let roots = forest();
        let hits = search(&roots, "Button", SearchOptions::default());
        assert_eq!(
            hits.iter().map(|h| h.node.id.as_str()).collect::<Vec<_>>(),
            vec!["1:3", "1:4"]
        );

        let hits = search(&roots, "utt", SearchOptions::default());
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_search_path_is_root_first() {
        let roots = forest();
        let hits = search(&roots, "C", SearchOptions::default().case_sensitive(true));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_search_case_sensitive_misses() {
        let roots = forest();
        let hits = search(&roots, "BUTTON", SearchOptions::default().case_sensitive(true));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_search_text_only() {
        let roots = forest();
        let options = SearchOptions {
            match_name: false,
            ..SearchOptions::default()
        };
        let hits = search(&roots, "sign", options);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node.id, "1:2");
    }

    #[test]
    fn test_unnamed_ancestors_use_type_in_path() {
        let roots: Vec<Node> = serde_json::from_value(json!([
            {"type": "FRAME", "children": [{"type": "TEXT", "name": "Title"}]}
        ]))
        .unwrap();
        let hits = search(&roots, "title", SearchOptions::default());
        assert_eq!(hits[0].path, vec!["FRAME", "Title"]);
    }
}
