//! Design-token extraction from a node forest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::format::{Typography, format_color, format_typography};
use crate::domains::tree::{Effect, Node, NodeType};

/// Padding on the four sides, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Spacing {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Token categories a caller can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TokenCategory {
    Colors,
    Typography,
    Spacing,
    Effects,
}

impl TokenCategory {
    pub const ALL: [TokenCategory; 4] = [
        TokenCategory::Colors,
        TokenCategory::Typography,
        TokenCategory::Spacing,
        TokenCategory::Effects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Colors => "colors",
            Self::Typography => "typography",
            Self::Spacing => "spacing",
            Self::Effects => "effects",
        }
    }
}

/// Named style values found in a design.
///
/// Keys are node names, or for unnamed nodes the `/`-joined labels of their
/// ancestors. Two nodes producing the same key: the later one wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DesignTokenSet {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub colors: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub typography: BTreeMap<String, Typography>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub spacing: BTreeMap<String, Spacing>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub effects: BTreeMap<String, Effect>,
}

impl DesignTokenSet {
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.typography.is_empty()
            && self.spacing.is_empty()
            && self.effects.is_empty()
    }

    pub fn len(&self, category: TokenCategory) -> usize {
        match category {
            TokenCategory::Colors => self.colors.len(),
            TokenCategory::Typography => self.typography.len(),
            TokenCategory::Spacing => self.spacing.len(),
            TokenCategory::Effects => self.effects.len(),
        }
    }

    /// Keep only the listed categories.
    pub fn retain(mut self, categories: &[TokenCategory]) -> Self {
        let keep = |category| categories.contains(&category);
        if !keep(TokenCategory::Colors) {
            self.colors.clear();
        }
        if !keep(TokenCategory::Typography) {
            self.typography.clear();
        }
        if !keep(TokenCategory::Spacing) {
            self.spacing.clear();
        }
        if !keep(TokenCategory::Effects) {
            self.effects.clear();
        }
        self
    }
}

/// Collect color, typography, spacing and effect tokens in one pre-order pass.
pub fn extract_design_tokens(roots: &[Node]) -> DesignTokenSet {
    let mut tokens = DesignTokenSet::default();
    let mut ancestors = Vec::new();
    for root in roots {
        visit(root, &mut ancestors, &mut tokens);
    }
    tokens
}

fn visit<'a>(node: &'a Node, ancestors: &mut Vec<&'a str>, tokens: &mut DesignTokenSet) {
    let name = node.display_name();
    let label = match name {
        Some(name) => name.to_string(),
        None if ancestors.is_empty() => node.node_type.to_string(),
        None => ancestors.join("/"),
    };

    let single_fill = node.fills.len() == 1;
    for (index, paint) in node.fills.iter().enumerate() {
        let Some(color) = paint.solid_color() else {
            continue;
        };
        let key = match name {
            Some(name) if single_fill => name.to_string(),
            _ => format!("{label}-fill-{index}"),
        };
        tokens.colors.insert(key, format_color(Some(color)));
    }

    for (index, paint) in node.strokes.iter().enumerate() {
        if let Some(color) = paint.solid_color() {
            tokens
                .colors
                .insert(format!("{label}-stroke-{index}"), format_color(Some(color)));
        }
    }

    if node.is_type(&NodeType::Text) {
        if let Some(style) = &node.style {
            tokens.typography.insert(label.clone(), format_typography(style));
        }
    }

    if node.has_padding() {
        tokens.spacing.insert(
            label.clone(),
            Spacing {
                top: node.padding_top.unwrap_or_default(),
                right: node.padding_right.unwrap_or_default(),
                bottom: node.padding_bottom.unwrap_or_default(),
                left: node.padding_left.unwrap_or_default(),
            },
        );
    }

    for (index, effect) in node.effects.iter().enumerate() {
        if effect.visible {
            tokens
                .effects
                .insert(format!("{label}-effect-{index}"), effect.clone());
        }
    }

    ancestors.push(node.label());
    for child in &node.children {
        visit(child, ancestors, tokens);
    }
    ancestors.pop();
}
