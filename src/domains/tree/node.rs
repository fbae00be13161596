//! Typed model of a design-file node tree.
//!
//! Every field is optional on the wire and deserialization never fails on a
//! shape mismatch inside the tree: a `children` value that is not an array
//! reads as "no children", unreadable array elements are skipped, and
//! ill-typed optional fields read as absent.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use crate::domains::lenient;

// =============================================================================
// Node
// =============================================================================

/// Node type discriminator. Unknown tags are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Instance,
    Text,
    Rectangle,
    Ellipse,
    Line,
    Vector,
    Star,
    RegularPolygon,
    BooleanOperation,
    Slice,
    Other(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Document => "DOCUMENT",
            Self::Canvas => "CANVAS",
            Self::Frame => "FRAME",
            Self::Group => "GROUP",
            Self::Section => "SECTION",
            Self::Component => "COMPONENT",
            Self::ComponentSet => "COMPONENT_SET",
            Self::Instance => "INSTANCE",
            Self::Text => "TEXT",
            Self::Rectangle => "RECTANGLE",
            Self::Ellipse => "ELLIPSE",
            Self::Line => "LINE",
            Self::Vector => "VECTOR",
            Self::Star => "STAR",
            Self::RegularPolygon => "REGULAR_POLYGON",
            Self::BooleanOperation => "BOOLEAN_OPERATION",
            Self::Slice => "SLICE",
            Self::Other(tag) => tag,
        }
    }
}

impl From<&str> for NodeType {
    fn from(tag: &str) -> Self {
        match tag {
            "DOCUMENT" => Self::Document,
            "CANVAS" => Self::Canvas,
            "FRAME" => Self::Frame,
            "GROUP" => Self::Group,
            "SECTION" => Self::Section,
            "COMPONENT" => Self::Component,
            "COMPONENT_SET" => Self::ComponentSet,
            "INSTANCE" => Self::Instance,
            "TEXT" => Self::Text,
            "RECTANGLE" => Self::Rectangle,
            "ELLIPSE" => Self::Ellipse,
            "LINE" => Self::Line,
            "VECTOR" => Self::Vector,
            "STAR" => Self::Star,
            "REGULAR_POLYGON" => Self::RegularPolygon,
            "BOOLEAN_OPERATION" => Self::BooleanOperation,
            "SLICE" => Self::Slice,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl Default for NodeType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient::string(deserializer).map(Self::from)
    }
}

impl Serialize for NodeType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One node of a design tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::option")]
    pub name: Option<String>,

    #[serde(rename = "type", default)]
    pub node_type: NodeType,

    #[serde(default, deserialize_with = "lenient::vec")]
    pub children: Vec<Node>,

    #[serde(default, deserialize_with = "lenient::vec")]
    pub fills: Vec<Paint>,

    #[serde(default, deserialize_with = "lenient::vec")]
    pub strokes: Vec<Paint>,

    #[serde(default, deserialize_with = "lenient::vec")]
    pub effects: Vec<Effect>,

    /// Text style; only meaningful on `TEXT` nodes.
    #[serde(default, deserialize_with = "lenient::option")]
    pub style: Option<TypeStyle>,

    #[serde(default, deserialize_with = "lenient::option")]
    pub absolute_bounding_box: Option<BoundingBox>,

    #[serde(default, deserialize_with = "lenient::option")]
    pub padding_top: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub padding_right: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub padding_bottom: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub padding_left: Option<f64>,

    /// Text content of text-bearing nodes.
    #[serde(default, deserialize_with = "lenient::option")]
    pub characters: Option<String>,

    #[serde(default, deserialize_with = "lenient::option")]
    pub description: Option<String>,

    /// Master component of an `INSTANCE`.
    #[serde(default, deserialize_with = "lenient::option")]
    pub component_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::option")]
    pub visible: Option<bool>,
}

impl Node {
    /// The node's name, treating an empty name as no name.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Name if present, else the type tag. Used for paths and listings.
    pub fn label(&self) -> &str {
        self.display_name().unwrap_or_else(|| self.node_type.as_str())
    }

    pub fn is_type(&self, node_type: &NodeType) -> bool {
        &self.node_type == node_type
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn has_padding(&self) -> bool {
        self.padding_top.is_some()
            || self.padding_right.is_some()
            || self.padding_bottom.is_some()
            || self.padding_left.is_some()
    }

    pub fn visible_fills(&self) -> impl Iterator<Item = &Paint> {
        self.fills.iter().filter(|paint| paint.visible)
    }

    pub fn visible_effects(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter().filter(|effect| effect.visible)
    }
}

/// Absolute position and size in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct BoundingBox {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl Color {
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct Vector {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Text style attributes as delivered by the design API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(default, deserialize_with = "lenient::option")]
    pub font_family: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub font_weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub font_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub line_height_px: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub line_height_percent_font_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub letter_spacing: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub text_align_horizontal: Option<String>,
}

// =============================================================================
// Paint
// =============================================================================

/// What a fill or stroke paints with.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintKind {
    Solid(Option<Color>),
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    Other(String),
}

impl PaintKind {
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Solid(_) => "SOLID",
            Self::GradientLinear => "GRADIENT_LINEAR",
            Self::GradientRadial => "GRADIENT_RADIAL",
            Self::GradientAngular => "GRADIENT_ANGULAR",
            Self::GradientDiamond => "GRADIENT_DIAMOND",
            Self::Image => "IMAGE",
            Self::Other(tag) => tag,
        }
    }
}

/// A fill or stroke entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawPaint")]
pub struct Paint {
    pub kind: PaintKind,
    pub visible: bool,
    pub opacity: Option<f64>,
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Self {
            kind: PaintKind::Solid(Some(color)),
            visible: true,
            opacity: None,
        }
    }

    /// Color of a `SOLID` paint that carries one.
    pub fn solid_color(&self) -> Option<&Color> {
        match &self.kind {
            PaintKind::Solid(color) => color.as_ref(),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawPaint {
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    kind: String,
    #[serde(default, deserialize_with = "lenient::option")]
    color: Option<Color>,
    #[serde(default, deserialize_with = "lenient::option")]
    visible: Option<bool>,
    #[serde(default, deserialize_with = "lenient::option")]
    opacity: Option<f64>,
}

impl From<RawPaint> for Paint {
    fn from(raw: RawPaint) -> Self {
        let kind = match raw.kind.as_str() {
            "SOLID" => PaintKind::Solid(raw.color),
            "GRADIENT_LINEAR" => PaintKind::GradientLinear,
            "GRADIENT_RADIAL" => PaintKind::GradientRadial,
            "GRADIENT_ANGULAR" => PaintKind::GradientAngular,
            "GRADIENT_DIAMOND" => PaintKind::GradientDiamond,
            "IMAGE" => PaintKind::Image,
            _ => PaintKind::Other(raw.kind),
        };
        Self {
            kind,
            visible: raw.visible.unwrap_or(true),
            opacity: raw.opacity,
        }
    }
}

// =============================================================================
// Effect
// =============================================================================

/// Shadow parameters shared by drop and inner shadows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shadow {
    pub color: Option<Color>,
    pub offset: Option<Vector>,
    pub radius: Option<f64>,
    pub spread: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EffectKind {
    DropShadow(Shadow),
    InnerShadow(Shadow),
    LayerBlur { radius: Option<f64> },
    BackgroundBlur { radius: Option<f64> },
    Other(String),
}

impl EffectKind {
    pub fn type_tag(&self) -> &str {
        match self {
            Self::DropShadow(_) => "DROP_SHADOW",
            Self::InnerShadow(_) => "INNER_SHADOW",
            Self::LayerBlur { .. } => "LAYER_BLUR",
            Self::BackgroundBlur { .. } => "BACKGROUND_BLUR",
            Self::Other(tag) => tag,
        }
    }
}

/// A shadow or blur attached to a node. `visible` defaults to true.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "RawEffect", into = "RawEffect")]
pub struct Effect {
    pub kind: EffectKind,
    pub visible: bool,
    pub blend_mode: Option<String>,
}

#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawEffect {
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::option")]
    visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::option")]
    color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::option")]
    offset: Option<Vector>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::option")]
    radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::option")]
    spread: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::option")]
    blend_mode: Option<String>,
}

impl From<RawEffect> for Effect {
    fn from(raw: RawEffect) -> Self {
        let shadow = || Shadow {
            color: raw.color,
            offset: raw.offset,
            radius: raw.radius,
            spread: raw.spread,
        };
        let kind = match raw.kind.as_str() {
            "DROP_SHADOW" => EffectKind::DropShadow(shadow()),
            "INNER_SHADOW" => EffectKind::InnerShadow(shadow()),
            "LAYER_BLUR" => EffectKind::LayerBlur { radius: raw.radius },
            "BACKGROUND_BLUR" => EffectKind::BackgroundBlur { radius: raw.radius },
            _ => EffectKind::Other(raw.kind.clone()),
        };
        Self {
            kind,
            visible: raw.visible.unwrap_or(true),
            blend_mode: raw.blend_mode,
        }
    }
}

impl From<Effect> for RawEffect {
    fn from(effect: Effect) -> Self {
        let mut raw = RawEffect {
            kind: effect.kind.type_tag().to_string(),
            visible: Some(effect.visible),
            color: None,
            offset: None,
            radius: None,
            spread: None,
            blend_mode: effect.blend_mode,
        };
        match effect.kind {
            EffectKind::DropShadow(shadow) | EffectKind::InnerShadow(shadow) => {
                raw.color = shadow.color;
                raw.offset = shadow.offset;
                raw.radius = shadow.radius;
                raw.spread = shadow.spread;
            }
            EffectKind::LayerBlur { radius } | EffectKind::BackgroundBlur { radius } => {
                raw.radius = radius;
            }
            EffectKind::Other(_) => {}
        }
        raw
    }
}
