//! Fills -> background/color, strokes -> border, vector nodes -> SVG payload.

use crate::alt_node::{format_number, px, AltNode, FillLayer, FillLayerKind, ImageData, SvgData};
use crate::figma::paint::{Color, Gradient, ImagePaint, Paint, PaintKind, ScaleMode};
use crate::figma::{DesignNode, NodeType};
use crate::variables::VariableMap;

pub(super) fn apply_fills(node: &DesignNode, alt: &mut AltNode<'_>, variables: &VariableMap) {
    if node.node_type.is_vector() {
        return;
    }
    let Some(paints) = node.paints() else {
        return;
    };
    let visible: Vec<&Paint> = paints.visible_fills().collect();
    let Some(first) = visible.first() else {
        return;
    };

    alt.fills = visible.iter().filter_map(|paint| fill_layer(paint)).collect();
    alt.image = visible.iter().rev().find_map(|paint| match &paint.kind {
        PaintKind::Image(ImagePaint {
            image_ref: Some(image_ref),
            scale_mode,
            ..
        }) => Some(ImageData {
            image_ref: image_ref.clone(),
            node_id: node.id.clone(),
            scale_mode: *scale_mode,
        }),
        _ => None,
    });

    let property = if node.node_type == NodeType::Text {
        "color"
    } else {
        "background"
    };
    match &first.kind {
        PaintKind::Solid { color } => {
            let rgba = color.to_css_rgba(color.a * first.opacity);
            let value = match node.bound_variable_id("fills") {
                Some(id) => variables.var_expr(id, &rgba),
                None => rgba,
            };
            alt.styles.set(property, value);
        }
        PaintKind::GradientLinear(gradient) => {
            alt.styles.set(property, linear_gradient(gradient));
        }
        PaintKind::GradientRadial(gradient) | PaintKind::GradientDiamond(gradient) => {
            alt.styles.set(property, radial_gradient(gradient));
        }
        PaintKind::GradientAngular(gradient) => {
            alt.styles.set(property, conic_gradient(gradient));
        }
        PaintKind::Image(image) => {
            if let Some(image_ref) = &image.image_ref {
                alt.styles.set("background-image", format!("url({})", image_ref));
                alt.styles.set("background-size", background_size(image.scale_mode));
            }
            if let Some(filter) = image_filters(image) {
                alt.styles.set("filter", filter);
            }
        }
        PaintKind::Unsupported => {}
    }
}

fn fill_layer(paint: &Paint) -> Option<FillLayer> {
    let kind = match &paint.kind {
        PaintKind::Solid { color } => FillLayerKind::Solid { color: *color },
        PaintKind::GradientLinear(g) => FillLayerKind::Gradient {
            css: linear_gradient(g),
        },
        PaintKind::GradientRadial(g) | PaintKind::GradientDiamond(g) => FillLayerKind::Gradient {
            css: radial_gradient(g),
        },
        PaintKind::GradientAngular(g) => FillLayerKind::Gradient {
            css: conic_gradient(g),
        },
        PaintKind::Image(image) => FillLayerKind::Image {
            image_ref: image.image_ref.clone()?,
            scale_mode: image.scale_mode,
        },
        PaintKind::Unsupported => return None,
    };
    Some(FillLayer {
        opacity: paint.opacity,
        kind,
    })
}

fn background_size(mode: ScaleMode) -> &'static str {
    match mode {
        ScaleMode::Fit => "contain",
        ScaleMode::Tile => "auto",
        ScaleMode::Stretch => "100% 100%",
        ScaleMode::Fill | ScaleMode::Crop | ScaleMode::Other => "cover",
    }
}

fn image_filters(image: &ImagePaint) -> Option<String> {
    let filters = image.filters?;
    let mut parts = Vec::new();
    if filters.exposure != 0.0 {
        parts.push(format!("brightness({})", format_number(1.0 + filters.exposure)));
    }
    if filters.contrast != 0.0 {
        parts.push(format!("contrast({})", format_number(1.0 + filters.contrast)));
    }
    if filters.saturation != 0.0 {
        parts.push(format!("saturate({})", format_number(1.0 + filters.saturation)));
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// CSS angle of the gradient axis (0deg = to top, clockwise), from the handles.
fn gradient_angle(gradient: &Gradient) -> Option<f64> {
    let [start, end, ..] = gradient.gradient_handle_positions.as_slice() else {
        return None;
    };
    let angle = (end.x - start.x).atan2(-(end.y - start.y)).to_degrees().round();
    Some(if angle < 0.0 { angle + 360.0 } else { angle })
}

/// Linear gradient whose stop positions are projected from the design
/// handles onto the CSS gradient line of a unit box.
pub(crate) fn linear_gradient(gradient: &Gradient) -> String {
    let angle = gradient_angle(gradient).unwrap_or(180.0);
    let (mut start_pct, mut end_pct) = (0.0, 100.0);

    if let [start, end, ..] = gradient.gradient_handle_positions.as_slice() {
        let radians = angle.to_radians();
        let (dir_x, dir_y) = (radians.sin(), -radians.cos());
        let dots = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)].map(|(x, y)| x * dir_x + y * dir_y);
        let min = dots.iter().copied().fold(f64::INFINITY, f64::min);
        let max = dots.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let extent = max - min;
        if extent > 0.0 {
            start_pct = ((start.x * dir_x + start.y * dir_y) - min) / extent * 100.0;
            end_pct = ((end.x * dir_x + end.y * dir_y) - min) / extent * 100.0;
        }
    }

    let stops = gradient
        .gradient_stops
        .iter()
        .map(|stop| {
            let pct = start_pct + stop.position * (end_pct - start_pct);
            format!("{} {:.2}%", stop.color.to_css_rgba(stop.color.a), pct)
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("linear-gradient({}deg, {})", format_number(angle), stops)
}

pub(crate) fn radial_gradient(gradient: &Gradient) -> String {
    format!("radial-gradient(circle, {})", plain_stops(gradient))
}

pub(crate) fn conic_gradient(gradient: &Gradient) -> String {
    let angle = gradient_angle(gradient).unwrap_or(0.0);
    format!(
        "conic-gradient(from {}deg, {})",
        format_number(angle),
        plain_stops(gradient)
    )
}

fn plain_stops(gradient: &Gradient) -> String {
    gradient
        .gradient_stops
        .iter()
        .map(|stop| {
            format!(
                "{} {}%",
                stop.color.to_css_rgba(stop.color.a),
                format_number(stop.position * 100.0)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub(super) fn apply_strokes(node: &DesignNode, alt: &mut AltNode<'_>, variables: &VariableMap) {
    if node.node_type.is_vector() {
        return;
    }
    let Some(paints) = node.paints() else {
        return;
    };
    let Some(stroke) = paints.visible_strokes().next() else {
        return;
    };

    let color = match &stroke.kind {
        PaintKind::Solid { color } => Some(color.to_css_rgba(color.a * stroke.opacity)),
        kind => stroke_gradient_color(kind),
    };
    let Some(color) = color else {
        return;
    };
    let variable = stroke
        .bound_variables
        .color
        .as_ref()
        .map(|alias| alias.id.as_str())
        .or_else(|| node.bound_variable_id("strokes"));
    let color = match variable {
        Some(id) => variables.var_expr(id, &color),
        None => color,
    };
    let style = if paints.stroke_dashes.is_empty() {
        "solid"
    } else {
        "dashed"
    };

    match paints.individual_stroke_weights {
        Some(weights) => {
            alt.styles.set("border-style", style);
            alt.styles.set("border-color", color);
            for (side, weight) in [
                ("top", weights.top),
                ("right", weights.right),
                ("bottom", weights.bottom),
                ("left", weights.left),
            ] {
                if weight > 0.0 {
                    alt.styles.set(format!("border-{}-width", side), px(weight));
                }
            }
        }
        None => {
            let weight = paints.stroke_weight.filter(|w| *w > 0.0).unwrap_or(1.0);
            alt.styles.set("border", format!("{} {} {}", px(weight), style, color));
        }
    }
}

fn stroke_gradient_color(kind: &PaintKind) -> Option<String> {
    let gradient = match kind {
        PaintKind::GradientLinear(g)
        | PaintKind::GradientRadial(g)
        | PaintKind::GradientAngular(g)
        | PaintKind::GradientDiamond(g) => g,
        _ => return None,
    };
    let first: &Color = &gradient.gradient_stops.first()?.color;
    Some(first.to_css_rgba(first.a))
}

pub(super) fn apply_vector_payload(node: &DesignNode, alt: &mut AltNode<'_>) {
    if !node.node_type.is_vector() {
        return;
    }
    let (Some(geometry), Some(paints)) = (node.vector_geometry(), node.paints()) else {
        return;
    };
    let strokes: Vec<Paint> = paints.visible_strokes().cloned().collect();
    let stroke_weight = if strokes.is_empty() {
        0.0
    } else {
        paints.stroke_weight.unwrap_or(1.0)
    };
    let (width, height) = match node.bounds {
        Some(b) => (b.width, b.height),
        None => (100.0, 100.0),
    };
    alt.svg = Some(SvgData {
        fill_geometry: geometry.fill_geometry.clone(),
        stroke_geometry: geometry.stroke_geometry.clone(),
        fills: paints.visible_fills().cloned().collect(),
        strokes,
        stroke_weight,
        width,
        height,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figma::paint::{ColorStop, Vector2};

    fn stops() -> Vec<ColorStop> {
        vec![
            ColorStop {
                color: Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 },
                position: 0.0,
            },
            ColorStop {
                color: Color { r: 0.0, g: 0.0, b: 1.0, a: 1.0 },
                position: 1.0,
            },
        ]
    }

    #[test]
    fn vertical_linear_gradient_points_down() {
        let gradient = Gradient {
            gradient_handle_positions: vec![Vector2 { x: 0.5, y: 0.0 }, Vector2 { x: 0.5, y: 1.0 }],
            gradient_stops: stops(),
        };
        assert_eq!(
            linear_gradient(&gradient),
            "linear-gradient(180deg, rgba(255, 0, 0, 1) 0.00%, rgba(0, 0, 255, 1) 100.00%)"
        );
    }

    #[test]
    fn horizontal_linear_gradient_points_right() {
        let gradient = Gradient {
            gradient_handle_positions: vec![Vector2 { x: 0.0, y: 0.5 }, Vector2 { x: 1.0, y: 0.5 }],
            gradient_stops: stops(),
        };
        assert!(linear_gradient(&gradient).starts_with("linear-gradient(90deg, "));
    }

    #[test]
    fn radial_and_conic_use_plain_stop_positions() {
        let gradient = Gradient {
            gradient_handle_positions: Vec::new(),
            gradient_stops: stops(),
        };
        assert_eq!(
            radial_gradient(&gradient),
            "radial-gradient(circle, rgba(255, 0, 0, 1) 0%, rgba(0, 0, 255, 1) 100%)"
        );
        assert!(conic_gradient(&gradient).starts_with("conic-gradient(from 0deg, "));
    }
}
