//! Typography for TEXT nodes. The text color comes from the fill pass.

use crate::alt_node::{format_number, px, AltNode};
use crate::figma::node::{
    LineHeightUnit, TextAlignHorizontal, TextAlignVertical, TextCase, TextDecoration, TypeStyle,
};
use crate::figma::DesignNode;

pub(super) fn apply(node: &DesignNode, alt: &mut AltNode<'_>) {
    let Some(text) = node.text() else {
        return;
    };
    let style = &text.style;
    let styles = &mut alt.styles;

    if let Some(family) = &style.font_family {
        styles.set("font-family", family.clone());
    }
    if let Some(weight) = font_weight(style) {
        styles.set("font-weight", weight);
    }
    if style.italic {
        styles.set("font-style", "italic");
    }
    if let Some(size) = style.font_size {
        styles.set("font-size", px(size));
    }
    if let Some(line_height) = line_height(style, node.height()) {
        styles.set("line-height", line_height);
    }
    if style.letter_spacing != 0.0 {
        styles.set("letter-spacing", px(style.letter_spacing));
    }

    let align = style.text_align_horizontal.and_then(|a| match a {
        TextAlignHorizontal::Left => Some("left"),
        TextAlignHorizontal::Center => Some("center"),
        TextAlignHorizontal::Right => Some("right"),
        TextAlignHorizontal::Justified => Some("justify"),
        TextAlignHorizontal::Unknown => None,
    });
    if let Some(align) = align {
        styles.set("text-align", align);
    }

    let vertical = style.text_align_vertical.and_then(|a| match a {
        TextAlignVertical::Top => Some("top"),
        TextAlignVertical::Center => Some("middle"),
        TextAlignVertical::Bottom => Some("bottom"),
        TextAlignVertical::Unknown => None,
    });
    if let Some(vertical) = vertical {
        styles.set("vertical-align", vertical);
    }

    let transform = style.text_case.and_then(|c| match c {
        TextCase::Upper => Some("uppercase"),
        TextCase::Lower => Some("lowercase"),
        TextCase::Title => Some("capitalize"),
        TextCase::Original | TextCase::SmallCaps | TextCase::SmallCapsForced | TextCase::Unknown => {
            None
        }
    });
    if let Some(transform) = transform {
        styles.set("text-transform", transform);
    }
    if matches!(style.text_case, Some(TextCase::SmallCaps | TextCase::SmallCapsForced)) {
        styles.set("font-variant", "small-caps");
    }

    let decoration = style.text_decoration.and_then(|d| match d {
        TextDecoration::Underline => Some("underline"),
        TextDecoration::Strikethrough => Some("line-through"),
        TextDecoration::None | TextDecoration::Unknown => None,
    });
    if let Some(decoration) = decoration {
        styles.set("text-decoration", decoration);
    }

    if style.paragraph_indent != 0.0 {
        styles.set("text-indent", px(style.paragraph_indent));
    }
}

/// Explicit numeric weight, else derived from the style name ("Semi Bold" -> 600).
pub(crate) fn font_weight(style: &TypeStyle) -> Option<f64> {
    style
        .font_weight
        .or_else(|| style.font_style.as_deref().and_then(weight_from_style_name))
}

pub(crate) fn weight_from_style_name(name: &str) -> Option<f64> {
    let normalized: String = name
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_lowercase();
    let normalized = normalized.trim_end_matches("italic");
    let weight = match normalized {
        "thin" | "hairline" => 100.0,
        "extralight" | "ultralight" => 200.0,
        "light" => 300.0,
        "regular" | "normal" | "" => 400.0,
        "medium" => 500.0,
        "semibold" | "demibold" => 600.0,
        "bold" => 700.0,
        "extrabold" | "ultrabold" => 800.0,
        "black" | "heavy" => 900.0,
        _ => return None,
    };
    Some(weight)
}

/// Pixel or unitless line height; `None` when it would exceed the text box.
fn line_height(style: &TypeStyle, box_height: f64) -> Option<String> {
    let pixels = style.line_height_px?;
    if box_height > 0.0 && pixels > box_height {
        return None;
    }
    match (style.line_height_unit, style.line_height_percent_font_size) {
        (Some(LineHeightUnit::FontSizePercent), Some(percent)) => {
            Some(format_number(percent / 100.0))
        }
        _ => Some(px(pixels)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn style_names_map_to_weights() {
        assert_eq!(weight_from_style_name("Semi Bold"), Some(600.0));
        assert_eq!(weight_from_style_name("ExtraLight"), Some(200.0));
        assert_eq!(weight_from_style_name("Bold Italic"), Some(700.0));
        assert_eq!(weight_from_style_name("Heavy"), Some(900.0));
        assert_eq!(weight_from_style_name("Condensed"), None);
    }

    #[test]
    fn explicit_weight_wins_over_style_name() {
        let style = TypeStyle {
            font_weight: Some(500.0),
            font_style: Some("Bold".into()),
            ..TypeStyle::default()
        };
        assert_eq!(font_weight(&style), Some(500.0));
    }

    #[test]
    fn text_pass_emits_typography() {
        let node = DesignNode::from_value(json!({
            "id": "1", "type": "TEXT", "characters": "Hi",
            "absoluteBoundingBox": { "x": 0, "y": 0, "width": 100, "height": 40 },
            "style": {
                "fontFamily": "Inter", "fontStyle": "Semi Bold", "fontSize": 16,
                "lineHeightPx": 24, "lineHeightUnit": "FONT_SIZE_%", "lineHeightPercentFontSize": 150,
                "letterSpacing": 0.5, "textAlignHorizontal": "CENTER", "textCase": "UPPER",
                "textDecoration": "UNDERLINE"
            }
        }))
        .expect("text node");
        let mut alt = AltNode::new(&node, "Hi".into(), node.node_type);
        apply(&node, &mut alt);

        let s = &alt.styles;
        assert_eq!(s.get_string("font-family").as_deref(), Some("Inter"));
        assert_eq!(s.get_string("font-weight").as_deref(), Some("600"));
        assert_eq!(s.get_string("font-size").as_deref(), Some("16px"));
        assert_eq!(s.get_string("line-height").as_deref(), Some("1.5"));
        assert_eq!(s.get_string("letter-spacing").as_deref(), Some("0.5px"));
        assert_eq!(s.get_string("text-align").as_deref(), Some("center"));
        assert_eq!(s.get_string("text-transform").as_deref(), Some("uppercase"));
        assert_eq!(s.get_string("text-decoration").as_deref(), Some("underline"));
    }

    #[test]
    fn line_height_taller_than_box_is_dropped() {
        let style = TypeStyle {
            line_height_px: Some(60.0),
            ..TypeStyle::default()
        };
        assert_eq!(line_height(&style, 40.0), None);
        assert_eq!(line_height(&style, 0.0).as_deref(), Some("60px"));
    }
}
