//! Local SVG reconstruction for vector nodes.
//!
//! Used when no exported SVG is available for a node: the fill and stroke
//! geometry carried on the AltNode is turned into a standalone document.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::alt_node::{format_number, AltNode, SvgData};
use crate::figma::paint::{Paint, PaintKind, WindingRule};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

fn paint_color(paint: &Paint) -> Option<String> {
    match &paint.kind {
        PaintKind::Solid { color } => Some(color.to_css(color.a * paint.opacity)),
        _ => None,
    }
}

/// Rebuild an SVG document from geometry; solid paints only.
pub fn reconstruct(data: &SvgData) -> String {
    let width = data.width.round();
    let height = data.height.round();
    let mut paths = String::new();

    if let Some(first_fill) = data.fills.first() {
        for (i, geometry) in data.fill_geometry.iter().enumerate() {
            let paint = data.fills.get(i).unwrap_or(first_fill);
            let Some(fill) = paint_color(paint) else {
                continue;
            };
            let rule = match geometry.winding_rule {
                WindingRule::Evenodd => "evenodd",
                _ => "nonzero",
            };
            paths.push_str(&format!(
                "<path d=\"{}\" fill=\"{}\" fill-rule=\"{}\" />",
                geometry.path, fill, rule
            ));
        }
    }

    if let Some(first_stroke) = data.strokes.first() {
        let weight = if data.stroke_weight > 0.0 { data.stroke_weight } else { 1.0 };
        for (i, geometry) in data.stroke_geometry.iter().enumerate() {
            let paint = data.strokes.get(i).unwrap_or(first_stroke);
            let Some(stroke) = paint_color(paint) else {
                continue;
            };
            paths.push_str(&format!(
                "<path d=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\" />",
                geometry.path,
                stroke,
                format_number(weight)
            ));
        }
    }

    format!(
        "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" fill=\"none\" xmlns=\"{ns}\">{paths}</svg>",
        w = format_number(width),
        h = format_number(height),
        ns = SVG_NS,
        paths = paths
    )
}

/// Stand-in document for a vector that could be neither fetched nor rebuilt.
pub fn placeholder(width: f64, height: f64) -> String {
    format!(
        "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" xmlns=\"{ns}\"><rect width=\"{w}\" height=\"{h}\" fill=\"#e5e7eb\" /></svg>",
        w = format_number(width.max(1.0).round()),
        h = format_number(height.max(1.0).round()),
        ns = SVG_NS
    )
}

pub fn data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg.as_bytes()))
}

/// Node renders as a single SVG image: a vector, or an icon container whose
/// content is vectors only.
pub fn is_svg_node(node: &AltNode<'_>) -> bool {
    if node.svg.is_some() {
        return true;
    }
    node.is_icon && !node.children.is_empty() && vector_only(node)
}

fn vector_only(node: &AltNode<'_>) -> bool {
    node.children.iter().all(|child| {
        if child.is_text() || child.image.is_some() {
            return false;
        }
        child.svg.is_some() || (!child.children.is_empty() && vector_only(child))
    })
}

/// `My Icon` -> `myIcon`, falling back to `vector`; duplicates get `2`, `3`...
pub fn variable_name(name: &str, used: &mut HashSet<String>) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let mut base: String = cleaned
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_ascii_lowercase();
            if i == 0 {
                return lower;
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    if base.is_empty() {
        base = "vector".to_string();
    }
    if base.starts_with(|c: char| c.is_ascii_digit()) {
        base = format!("svg{}", base);
    }
    let mut candidate = base.clone();
    let mut counter = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}{}", base, counter);
        counter += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figma::paint::{Color, GeometryPath};

    fn triangle() -> SvgData {
        SvgData {
            fill_geometry: vec![GeometryPath {
                path: "M0 0L10 0L5 10Z".to_string(),
                winding_rule: WindingRule::Evenodd,
            }],
            stroke_geometry: Vec::new(),
            fills: vec![Paint::solid(Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 })],
            strokes: Vec::new(),
            stroke_weight: 0.0,
            width: 10.0,
            height: 10.4,
        }
    }

    #[test]
    fn reconstructs_filled_paths() {
        let svg = reconstruct(&triangle());
        assert!(svg.starts_with("<svg width=\"10\" height=\"10\" viewBox=\"0 0 10 10\""));
        assert!(svg.contains("<path d=\"M0 0L10 0L5 10Z\" fill=\"#ff0000\" fill-rule=\"evenodd\" />"));
    }

    #[test]
    fn data_url_is_base64() {
        assert_eq!(data_url("<svg/>"), "data:image/svg+xml;base64,PHN2Zy8+");
    }

    #[test]
    fn variable_names_are_unique_camel_case() {
        let mut used = HashSet::new();
        assert_eq!(variable_name("My Icon", &mut used), "myIcon");
        assert_eq!(variable_name("my icon", &mut used), "myIcon2");
        assert_eq!(variable_name("***", &mut used), "vector");
        assert_eq!(variable_name("", &mut used), "vector2");
    }
}
