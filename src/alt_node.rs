//! Canonical intermediate tree produced by the transformer.
//!
//! An [`AltNode`] borrows its originating [`DesignNode`] so downstream stages
//! can still reach raw data (text content, component properties, selector
//! attributes) the canonical model does not copy.

use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::figma::node::HtmlTag;
use crate::figma::paint::{Color, GeometryPath, Paint, ScaleMode};
use crate::figma::{DesignNode, NodeType};
use crate::{FcgError, Result};

/// Format a number for CSS: at most two decimals, no trailing zeros.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn px(value: f64) -> String {
    format!("{}px", format_number(value))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Num(f64),
    Str(String),
}

impl StyleValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Str(s) => Some(s),
            StyleValue::Num(_) => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Num(n) => f.write_str(&format_number(*n)),
            StyleValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Str(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Str(value.to_string())
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Num(value)
    }
}

/// Ordered CSS-like property map; keys are kebab-case CSS property names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap(IndexMap<String, StyleValue>);

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Set only when the key is not present yet.
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.0.entry(key.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.0.get(key)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.0.get(key).map(ToString::to_string)
    }

    /// True when the key holds exactly `value`.
    pub fn is(&self, key: &str, value: &str) -> bool {
        self.get_string(key).as_deref() == Some(value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<StyleValue> {
        self.0.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StyleValue)> {
        self.0.iter()
    }

    /// Key-by-key merge; `other` wins on collisions.
    pub fn merge(&mut self, other: &StyleMap) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FillLayerKind {
    Solid { color: Color },
    /// Fully built CSS gradient expression.
    Gradient { css: String },
    Image { image_ref: String, scale_mode: ScaleMode },
}

/// One visible paint layer, in source order (bottom first).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillLayer {
    pub opacity: f64,
    #[serde(flatten)]
    pub kind: FillLayerKind,
}

impl FillLayer {
    pub fn image_ref(&self) -> Option<&str> {
        match &self.kind {
            FillLayerKind::Image { image_ref, .. } => Some(image_ref),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub image_ref: String,
    pub node_id: String,
    pub scale_mode: ScaleMode,
}

/// Geometry and paints needed to rebuild a vector node locally.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgData {
    pub fill_geometry: Vec<GeometryPath>,
    pub stroke_geometry: Vec<GeometryPath>,
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weight: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    Row,
    Column,
}

/// Negative item spacing, which `gap` cannot express.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NegativeSpacing {
    pub value: f64,
    pub direction: FlexDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lg: Option<StyleMap>,
}

/// Which breakpoints a node exists at after a responsive merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    pub mobile: bool,
    pub tablet: bool,
    pub desktop: bool,
}

impl Presence {
    /// Present at some breakpoints but not all.
    pub fn is_partial(&self) -> bool {
        let count = [self.mobile, self.tablet, self.desktop]
            .iter()
            .filter(|p| **p)
            .count();
        count > 0 && count < 3
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AltNode<'src> {
    pub id: String,
    pub name: String,
    pub unique_name: String,
    #[serde(rename = "type")]
    pub tag: HtmlTag,
    pub original_type: NodeType,
    pub styles: StyleMap,
    pub children: Vec<AltNode<'src>>,
    #[serde(skip)]
    pub source: &'src DesignNode,
    pub visible: bool,
    pub cumulative_rotation: f64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_icon: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<FillLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<SvgData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_image_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_spacing: Option<NegativeSpacing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsive: Option<ResponsiveStyles>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence: Option<Presence>,
}

impl<'src> AltNode<'src> {
    /// Skeleton with an empty style map; `tag` always follows `original_type`.
    pub fn new(source: &'src DesignNode, unique_name: String, original_type: NodeType) -> Self {
        Self {
            id: source.id.clone(),
            name: source.name.clone(),
            unique_name,
            tag: original_type.html_tag(),
            original_type,
            styles: StyleMap::new(),
            children: Vec::new(),
            source,
            visible: source.visible,
            cumulative_rotation: 0.0,
            is_icon: false,
            fills: Vec::new(),
            image: None,
            svg: None,
            mask_image_ref: None,
            negative_spacing: None,
            responsive: None,
            presence: None,
        }
    }

    pub fn is_text(&self) -> bool {
        self.original_type == NodeType::Text
    }

    pub fn is_group(&self) -> bool {
        self.original_type == NodeType::Group
    }

    pub fn is_absolute(&self) -> bool {
        self.styles.is("position", "absolute")
    }

    pub fn characters(&self) -> Option<&str> {
        self.source.text().map(|t| t.characters.as_str())
    }

    /// Pre-order walk over this node and its descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a AltNode<'src>)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }
}

/// Externally produced responsive data for one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveOverlay {
    #[serde(default)]
    pub md: Option<StyleMap>,
    #[serde(default)]
    pub lg: Option<StyleMap>,
    #[serde(default)]
    pub presence: Option<Presence>,
}

/// Overlays keyed by node id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponsiveOverlays(IndexMap<String, ResponsiveOverlay>);

impl ResponsiveOverlays {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            FcgError::Config(format!(
                "Failed to read responsive overlays {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn insert(&mut self, node_id: impl Into<String>, overlay: ResponsiveOverlay) {
        self.0.insert(node_id.into(), overlay);
    }

    /// Attach overlays to matching nodes; returns how many nodes were touched.
    pub fn apply(&self, root: &mut AltNode<'_>) -> usize {
        let mut applied = 0;
        if let Some(overlay) = self.0.get(&root.id) {
            if overlay.md.is_some() || overlay.lg.is_some() {
                root.responsive = Some(ResponsiveStyles {
                    md: overlay.md.clone(),
                    lg: overlay.lg.clone(),
                });
            }
            if overlay.presence.is_some() {
                root.presence = overlay.presence;
            }
            applied += 1;
        }
        for child in &mut root.children {
            applied += self.apply(child);
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_number_trims_trailing_zeros() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(12.345), "12.35");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(-0.001), "0");
        assert_eq!(px(16.0), "16px");
    }

    #[test]
    fn style_map_merges_key_by_key() {
        let mut base: StyleMap = [("width", "10px"), ("color", "red")].into_iter().collect();
        let overlay: StyleMap = [("color", "blue")].into_iter().collect();
        base.merge(&overlay);
        assert_eq!(base.get_string("width").as_deref(), Some("10px"));
        assert_eq!(base.get_string("color").as_deref(), Some("blue"));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn style_map_set_default_keeps_existing_value() {
        let mut styles = StyleMap::new();
        styles.set("opacity", 0.5);
        styles.set_default("opacity", 1.0);
        assert_eq!(styles.get_string("opacity").as_deref(), Some("0.5"));
    }

    #[test]
    fn presence_partial_detection() {
        let mobile_only = Presence { mobile: true, tablet: false, desktop: false };
        let everywhere = Presence { mobile: true, tablet: true, desktop: true };
        assert!(mobile_only.is_partial());
        assert!(!everywhere.is_partial());
    }

    #[test]
    fn overlays_attach_by_node_id() {
        let source = DesignNode::from_value(json!({ "id": "1:1", "type": "FRAME" })).expect("node");
        let mut node = AltNode::new(&source, "Frame".into(), NodeType::Frame);
        let overlays: ResponsiveOverlays = serde_json::from_value(json!({
            "1:1": { "md": { "width": "50%" }, "presence": { "mobile": false, "tablet": true, "desktop": true } }
        }))
        .expect("overlays");

        assert_eq!(overlays.apply(&mut node), 1);
        let responsive = node.responsive.expect("responsive styles");
        assert_eq!(
            responsive.md.and_then(|m| m.get_string("width")).as_deref(),
            Some("50%")
        );
        assert!(node.presence.expect("presence").is_partial());
    }
}
