//! Value formatters turning raw style attributes into CSS-ready strings.

use serde::Serialize;

use crate::domains::tree::{Color, TypeStyle};

/// `#rrggbb` when fully opaque, `rgba(r, g, b, a)` otherwise; `transparent`
/// when there is no color at all.
pub fn format_color(color: Option<&Color>) -> String {
    let Some(color) = color else {
        return "transparent".to_string();
    };

    let red = channel(color.r);
    let green = channel(color.g);
    let blue = channel(color.b);

    if color.a == 1.0 {
        format!("#{red:02x}{green:02x}{blue:02x}")
    } else {
        format!("rgba({red}, {green}, {blue}, {:.3})", color.a)
    }
}

fn channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Typography token in its rendered form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    pub line_height: String,
    pub letter_spacing: String,
    pub text_align: String,
}

/// Render a text style with units: sizes in `px`, percentage line heights
/// in `%`, `normal` where nothing (or zero) is set.
pub fn format_typography(style: &TypeStyle) -> Typography {
    let line_height = match (style.line_height_px, style.line_height_percent_font_size) {
        (Some(px), _) if px != 0.0 => format!("{px}px"),
        (_, Some(percent)) if percent != 0.0 => format!("{percent}%"),
        _ => "normal".to_string(),
    };

    let letter_spacing = match style.letter_spacing {
        Some(spacing) if spacing != 0.0 => format!("{spacing}px"),
        _ => "normal".to_string(),
    };

    let text_align = style
        .text_align_horizontal
        .as_deref()
        .filter(|align| !align.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "left".to_string());

    Typography {
        font_family: style.font_family.clone(),
        font_weight: style.font_weight,
        font_size: style.font_size.map(|size| format!("{size}px")),
        line_height,
        letter_spacing,
        text_align,
    }
}

/// Lower-case a token name and replace everything but `[a-z0-9]` with `-`.
pub fn css_identifier(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect()
}
