//! Geometry, paints, colors and effects as they appear in Figma node JSON.

use palette::Srgb;
use serde::{Deserialize, Serialize};

use super::lenient;

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

/// Axis-aligned rectangle in absolute canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default, deserialize_with = "lenient::number")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub y: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub width: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    #[serde(default, deserialize_with = "lenient::number")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub y: f64,
}

/// RGBA color from Figma (0.0-1.0 range).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    #[serde(default)]
    pub r: f64,
    #[serde(default)]
    pub g: f64,
    #[serde(default)]
    pub b: f64,
    #[serde(default = "default_one")]
    pub a: f64,
}

impl Default for Color {
    fn default() -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        }
    }
}

impl Color {
    /// 8-bit channels, rounded.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let rgb: Srgb<u8> = Srgb::new(
            self.r.clamp(0.0, 1.0) as f32,
            self.g.clamp(0.0, 1.0) as f32,
            self.b.clamp(0.0, 1.0) as f32,
        )
        .into_format();
        (rgb.red, rgb.green, rgb.blue)
    }

    /// Convert to hex color string (e.g., "#ff8000").
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// `rgba(r, g, b, alpha)` with the given effective alpha.
    pub fn to_css_rgba(&self, alpha: f64) -> String {
        let (r, g, b) = self.to_rgb8();
        format!(
            "rgba({}, {}, {}, {})",
            r,
            g,
            b,
            crate::alt_node::format_number(alpha.clamp(0.0, 1.0))
        )
    }

    /// Hex when opaque, `rgba(...)` otherwise.
    pub fn to_css(&self, alpha: f64) -> String {
        if alpha >= 1.0 {
            self.to_hex()
        } else {
            self.to_css_rgba(alpha)
        }
    }
}

/// Reference to an external design variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableAlias {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaintVariables {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<VariableAlias>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorStop {
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    #[serde(default)]
    pub gradient_handle_positions: Vec<Vector2>,
    #[serde(default)]
    pub gradient_stops: Vec<ColorStop>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScaleMode {
    #[default]
    Fill,
    Fit,
    Tile,
    Stretch,
    Crop,
    #[serde(other)]
    Other,
}

impl ScaleMode {
    /// CSS `object-fit` / `background-size` keyword.
    pub fn object_fit(self) -> &'static str {
        match self {
            ScaleMode::Fill | ScaleMode::Crop | ScaleMode::Other => "cover",
            ScaleMode::Fit => "contain",
            ScaleMode::Tile => "none",
            ScaleMode::Stretch => "fill",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFilters {
    #[serde(default)]
    pub exposure: f64,
    #[serde(default)]
    pub contrast: f64,
    #[serde(default)]
    pub saturation: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePaint {
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub scale_mode: ScaleMode,
    #[serde(default)]
    pub filters: Option<ImageFilters>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintKind {
    Solid {
        #[serde(default)]
        color: Color,
    },
    GradientLinear(Gradient),
    GradientRadial(Gradient),
    GradientAngular(Gradient),
    GradientDiamond(Gradient),
    Image(ImagePaint),
    #[serde(other)]
    Unsupported,
}

/// A single fill or stroke layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_one")]
    pub opacity: f64,
    #[serde(default)]
    pub bound_variables: PaintVariables,
    #[serde(flatten)]
    pub kind: PaintKind,
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Self {
            visible: true,
            opacity: 1.0,
            bound_variables: PaintVariables::default(),
            kind: PaintKind::Solid { color },
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, PaintKind::Image(_))
    }

    pub fn image_ref(&self) -> Option<&str> {
        match &self.kind {
            PaintKind::Image(image) => image.image_ref.as_deref(),
            _ => None,
        }
    }

    pub fn gradient(&self) -> Option<&Gradient> {
        match &self.kind {
            PaintKind::GradientLinear(g)
            | PaintKind::GradientRadial(g)
            | PaintKind::GradientAngular(g)
            | PaintKind::GradientDiamond(g) => Some(g),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub offset: Vector2,
    #[serde(default)]
    pub spread: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WindingRule {
    #[default]
    Nonzero,
    Evenodd,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryPath {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub winding_rule: WindingRule,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_to_hex_rounds_channels() {
        let color = Color {
            r: 1.0,
            g: 0.5,
            b: 0.0,
            a: 1.0,
        };
        assert_eq!(color.to_hex(), "#ff8000");
    }

    #[test]
    fn color_to_css_rgba_uses_effective_alpha() {
        let red = Color {
            r: 1.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        };
        assert_eq!(red.to_css_rgba(1.0), "rgba(255, 0, 0, 1)");
        assert_eq!(red.to_css_rgba(0.5), "rgba(255, 0, 0, 0.5)");
        assert_eq!(red.to_css(1.0), "#ff0000");
    }

    #[test]
    fn paint_parses_solid_with_defaults() {
        let paint: Paint = serde_json::from_value(serde_json::json!({
            "type": "SOLID",
            "color": { "r": 0, "g": 0, "b": 1 }
        }))
        .expect("solid paint");
        assert!(paint.visible);
        assert_eq!(paint.opacity, 1.0);
        match paint.kind {
            PaintKind::Solid { color } => assert_eq!(color.a, 1.0),
            other => panic!("expected solid, got {other:?}"),
        }
    }

    #[test]
    fn paint_parses_image_and_unknown_types() {
        let image: Paint = serde_json::from_value(serde_json::json!({
            "type": "IMAGE",
            "imageRef": "abc123",
            "scaleMode": "FIT"
        }))
        .expect("image paint");
        assert_eq!(image.image_ref(), Some("abc123"));

        let video: Paint = serde_json::from_value(serde_json::json!({
            "type": "VIDEO",
            "visible": false
        }))
        .expect("unknown paint type should not fail");
        assert!(matches!(video.kind, PaintKind::Unsupported));
        assert!(!video.visible);
    }

    #[test]
    fn scale_mode_maps_to_object_fit() {
        assert_eq!(ScaleMode::Fill.object_fit(), "cover");
        assert_eq!(ScaleMode::Fit.object_fit(), "contain");
        assert_eq!(ScaleMode::Tile.object_fit(), "none");
    }
}
