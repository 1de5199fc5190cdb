//! Catch-all property mapping and geometric shape special cases.
//!
//! The catch-all pass guarantees every recognized source property ends up as
//! some CSS declaration even when no rule matches later. It runs before the
//! specialized passes, which may overwrite what it sets.

use crate::alt_node::{format_number, px, AltNode, FlexDirection, NegativeSpacing, StyleValue};
use crate::figma::{AxisAlign, DesignNode, LayoutAlign, LayoutMode, NodeType};
use crate::variables::VariableMap;

const CORNER_KEYS: [&str; 4] = [
    "topLeftRadius",
    "topRightRadius",
    "bottomRightRadius",
    "bottomLeftRadius",
];

const CORNER_PROPERTIES: [&str; 4] = [
    "border-top-left-radius",
    "border-top-right-radius",
    "border-bottom-right-radius",
    "border-bottom-left-radius",
];

pub(super) fn apply(node: &DesignNode, alt: &mut AltNode<'_>, variables: &VariableMap) {
    let bound = |property: &str, fallback: String| match node.bound_variable_id(property) {
        Some(id) => variables.var_expr(id, &fallback),
        None => fallback,
    };

    if node.opacity < 1.0 {
        let value: StyleValue = match node.bound_variable_id("opacity") {
            Some(id) => variables.var_expr(id, &format_number(node.opacity)).into(),
            None => node.opacity.into(),
        };
        alt.styles.set("opacity", value);
    }

    if let Some(layout) = node.auto_layout() {
        if matches!(layout.mode, LayoutMode::Horizontal | LayoutMode::Vertical) {
            let spacing = layout.item_spacing;
            if spacing < 0.0 {
                alt.negative_spacing = Some(NegativeSpacing {
                    value: spacing,
                    direction: if layout.mode == LayoutMode::Horizontal {
                        FlexDirection::Row
                    } else {
                        FlexDirection::Column
                    },
                });
            } else if spacing > 0.0 && layout.primary_align != AxisAlign::SpaceBetween {
                alt.styles.set("gap", bound("itemSpacing", px(spacing)));
            }
        }
        if let Some(counter) = layout.counter_axis_spacing.filter(|s| *s > 0.0) {
            alt.styles.set("row-gap", bound("counterAxisSpacing", px(counter)));
        }
    }

    corner_radii(node, alt, variables);

    let limits = node.size_limits;
    for (key, property, value) in [
        ("minWidth", "min-width", limits.min_width),
        ("maxWidth", "max-width", limits.max_width),
        ("minHeight", "min-height", limits.min_height),
        ("maxHeight", "max-height", limits.max_height),
    ] {
        if let Some(value) = value {
            alt.styles.set(property, bound(key, px(value)));
        }
    }

    if node.clips_content() {
        alt.styles.set("overflow", "hidden");
    }
    if let Some(mode) = node.blend_mode.css_value() {
        alt.styles.set("mix-blend-mode", mode);
    }
    if node.preserve_ratio {
        if let Some(b) = node.bounds.filter(|b| b.height > 0.0) {
            alt.styles.set("aspect-ratio", format!("{:.4}", b.width / b.height));
        }
    }
    if node.layout_child.align == Some(LayoutAlign::Stretch) {
        alt.styles.set("align-self", "stretch");
    }
    if node.layout_child.grow > 0.0 {
        alt.styles.set("flex-grow", node.layout_child.grow);
    }
}

fn corner_radii(node: &DesignNode, alt: &mut AltNode<'_>, variables: &VariableMap) {
    let Some(corners) = node.corners() else {
        return;
    };

    let ids: Vec<Option<&str>> = CORNER_KEYS.iter().map(|k| node.bound_variable_id(k)).collect();
    let shared = match ids.first() {
        Some(Some(first)) if ids.iter().all(|id| *id == Some(*first)) => Some(*first),
        _ => None,
    };
    if let Some(id) = shared.or_else(|| node.bound_variable_id("cornerRadius")) {
        let fallback = px(corners.uniform.unwrap_or(0.0));
        alt.styles.set("border-radius", variables.var_expr(id, &fallback));
        return;
    }

    if let Some(radius) = corners.uniform.filter(|r| *r > 0.0) {
        alt.styles.set("border-radius", px(radius));
    }

    let Some(radii) = corners.per_corner else {
        return;
    };
    if radii.iter().all(|r| *r == radii[0]) {
        if radii[0] > 0.0 {
            alt.styles.set("border-radius", px(radii[0]));
        }
        return;
    }
    let shorthand = radii.iter().map(|r| px(*r)).collect::<Vec<_>>().join(" ");
    alt.styles.set("border-radius", shorthand);
    for (property, radius) in CORNER_PROPERTIES.iter().zip(radii) {
        if radius > 0.0 {
            alt.styles.set(*property, px(radius));
        }
    }
}

pub(super) fn apply_shape(node: &DesignNode, alt: &mut AltNode<'_>) {
    match node.node_type {
        NodeType::Ellipse => {
            alt.styles.set("border-radius", "50%");
            alt.styles.set("overflow", "hidden");
        }
        NodeType::Polygon | NodeType::Star | NodeType::RegularPolygon => {
            let path = node
                .vector_geometry()
                .and_then(|g| g.fill_geometry.first())
                .map(|g| g.path.as_str())
                .filter(|p| !p.is_empty());
            if let Some(path) = path {
                alt.styles.set("clip-path", format!("path('{}')", path));
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::Variable;
    use serde_json::json;

    fn run(value: serde_json::Value, variables: &VariableMap) -> (crate::alt_node::StyleMap, Option<NegativeSpacing>) {
        let node = DesignNode::from_value(value).expect("node");
        let mut alt = AltNode::new(&node, "Node".into(), node.node_type);
        apply(&node, &mut alt, variables);
        apply_shape(&node, &mut alt);
        (alt.styles, alt.negative_spacing)
    }

    #[test]
    fn opacity_gap_and_radius_have_fallbacks() {
        let (styles, negative) = run(
            json!({
                "id": "1", "type": "FRAME", "opacity": 0.5, "layoutMode": "VERTICAL",
                "itemSpacing": 8, "cornerRadius": 12, "clipsContent": true
            }),
            &VariableMap::new(),
        );
        assert_eq!(styles.get_string("opacity").as_deref(), Some("0.5"));
        assert_eq!(styles.get_string("gap").as_deref(), Some("8px"));
        assert_eq!(styles.get_string("border-radius").as_deref(), Some("12px"));
        assert!(styles.is("overflow", "hidden"));
        assert!(negative.is_none());
    }

    #[test]
    fn negative_spacing_goes_to_side_channel() {
        let (styles, negative) = run(
            json!({ "id": "1", "type": "FRAME", "layoutMode": "HORIZONTAL", "itemSpacing": -12 }),
            &VariableMap::new(),
        );
        assert!(!styles.contains_key("gap"));
        let negative = negative.expect("negative spacing");
        assert_eq!(negative.value, -12.0);
        assert_eq!(negative.direction, FlexDirection::Row);
    }

    #[test]
    fn space_between_suppresses_gap() {
        let (styles, _) = run(
            json!({ "id": "1", "type": "FRAME", "layoutMode": "HORIZONTAL", "itemSpacing": 10,
                    "primaryAxisAlignItems": "SPACE_BETWEEN" }),
            &VariableMap::new(),
        );
        assert!(!styles.contains_key("gap"));
    }

    #[test]
    fn per_corner_radii_emit_shorthand_and_corners() {
        let (styles, _) = run(
            json!({ "id": "1", "type": "RECTANGLE", "rectangleCornerRadii": [8, 8, 0, 0] }),
            &VariableMap::new(),
        );
        assert_eq!(styles.get_string("border-radius").as_deref(), Some("8px 8px 0px 0px"));
        assert_eq!(styles.get_string("border-top-left-radius").as_deref(), Some("8px"));
        assert!(!styles.contains_key("border-bottom-left-radius"));
    }

    #[test]
    fn shared_corner_variable_becomes_var_expression() {
        let mut variables = VariableMap::new();
        variables.insert(
            "VariableID:5:1",
            Variable {
                name: "Radius/Card".into(),
                value: json!(16),
                kind: crate::variables::VariableKind::BorderRadius,
            },
        );
        let alias = json!({ "type": "VARIABLE_ALIAS", "id": "VariableID:5:1" });
        let (styles, _) = run(
            json!({
                "id": "1", "type": "FRAME", "cornerRadius": 16,
                "boundVariables": {
                    "topLeftRadius": alias, "topRightRadius": alias,
                    "bottomRightRadius": alias, "bottomLeftRadius": alias
                }
            }),
            &variables,
        );
        assert_eq!(
            styles.get_string("border-radius").as_deref(),
            Some("var(--radius-card, 16px)")
        );
    }

    #[test]
    fn ellipse_and_star_shapes() {
        let (ellipse, _) = run(json!({ "id": "1", "type": "ELLIPSE" }), &VariableMap::new());
        assert!(ellipse.is("border-radius", "50%"));

        let (star, _) = run(
            json!({ "id": "2", "type": "STAR", "fillGeometry": [{ "path": "M0 0L10 0L5 10Z" }] }),
            &VariableMap::new(),
        );
        assert_eq!(star.get_string("clip-path").as_deref(), Some("path('M0 0L10 0L5 10Z')"));
    }

    #[test]
    fn blend_ratio_and_grow() {
        let (styles, _) = run(
            json!({
                "id": "1", "type": "RECTANGLE", "blendMode": "MULTIPLY", "preserveRatio": true,
                "absoluteBoundingBox": { "x": 0, "y": 0, "width": 16, "height": 9 },
                "layoutGrow": 1, "layoutAlign": "STRETCH"
            }),
            &VariableMap::new(),
        );
        assert!(styles.is("mix-blend-mode", "multiply"));
        assert!(styles.is("aspect-ratio", "1.7778"));
        assert!(styles.is("flex-grow", "1"));
        assert!(styles.is("align-self", "stretch"));
    }
}
