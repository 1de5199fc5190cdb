//! Source design-node model.
//!
//! Figma node JSON is parsed once, at the boundary, into [`DesignNode`]: a set of
//! attributes every node carries plus a [`NodeKind`] union that only exposes the
//! fields a given kind of node actually has. Unknown enum strings degrade to an
//! `Other`/`Unknown` variant instead of failing the whole document.

use std::f64::consts::PI;

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;
use super::paint::{Effect, GeometryPath, Paint, Rect, Vector2, VariableAlias};

/// Node `type` strings from the design tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Instance,
    Rectangle,
    Ellipse,
    Polygon,
    Star,
    RegularPolygon,
    Line,
    Vector,
    BooleanOperation,
    Text,
    Other,
}

impl NodeType {
    /// Boundary parse: anything unrecognized becomes [`NodeType::Other`].
    pub fn parse(raw: &str) -> Self {
        match raw {
            "FRAME" => NodeType::Frame,
            "GROUP" => NodeType::Group,
            "SECTION" => NodeType::Section,
            "COMPONENT" => NodeType::Component,
            "COMPONENT_SET" => NodeType::ComponentSet,
            "INSTANCE" => NodeType::Instance,
            "RECTANGLE" => NodeType::Rectangle,
            "ELLIPSE" => NodeType::Ellipse,
            "POLYGON" => NodeType::Polygon,
            "STAR" => NodeType::Star,
            "REGULAR_POLYGON" => NodeType::RegularPolygon,
            "LINE" => NodeType::Line,
            "VECTOR" => NodeType::Vector,
            "BOOLEAN_OPERATION" => NodeType::BooleanOperation,
            "TEXT" => NodeType::Text,
            _ => NodeType::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Frame => "FRAME",
            NodeType::Group => "GROUP",
            NodeType::Section => "SECTION",
            NodeType::Component => "COMPONENT",
            NodeType::ComponentSet => "COMPONENT_SET",
            NodeType::Instance => "INSTANCE",
            NodeType::Rectangle => "RECTANGLE",
            NodeType::Ellipse => "ELLIPSE",
            NodeType::Polygon => "POLYGON",
            NodeType::Star => "STAR",
            NodeType::RegularPolygon => "REGULAR_POLYGON",
            NodeType::Line => "LINE",
            NodeType::Vector => "VECTOR",
            NodeType::BooleanOperation => "BOOLEAN_OPERATION",
            NodeType::Text => "TEXT",
            NodeType::Other => "OTHER",
        }
    }

    /// Output element for this node type.
    pub fn html_tag(self) -> HtmlTag {
        match self {
            NodeType::Text => HtmlTag::Span,
            NodeType::Vector | NodeType::BooleanOperation | NodeType::Line => HtmlTag::Svg,
            NodeType::Frame
            | NodeType::Group
            | NodeType::Section
            | NodeType::Component
            | NodeType::ComponentSet
            | NodeType::Instance
            | NodeType::Rectangle
            | NodeType::Ellipse
            | NodeType::Polygon
            | NodeType::Star
            | NodeType::RegularPolygon
            | NodeType::Other => HtmlTag::Div,
        }
    }

    pub fn is_vector(self) -> bool {
        matches!(
            self,
            NodeType::Vector | NodeType::BooleanOperation | NodeType::Line
        )
    }

    pub fn is_component(self) -> bool {
        matches!(
            self,
            NodeType::Component | NodeType::ComponentSet | NodeType::Instance
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HtmlTag {
    Div,
    Span,
    Svg,
}

impl HtmlTag {
    pub fn as_str(self) -> &'static str {
        match self {
            HtmlTag::Div => "div",
            HtmlTag::Span => "span",
            HtmlTag::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    #[default]
    None,
    Horizontal,
    Vertical,
    Grid,
    #[serde(other)]
    Unknown,
}

impl LayoutMode {
    pub fn is_auto_layout(self) -> bool {
        matches!(
            self,
            LayoutMode::Horizontal | LayoutMode::Vertical | LayoutMode::Grid
        )
    }
}

/// Primary and counter axis alignment values share one enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisAlign {
    #[default]
    Min,
    Center,
    Max,
    SpaceBetween,
    Baseline,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutWrap {
    #[default]
    NoWrap,
    Wrap,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sizing {
    Fixed,
    Hug,
    Fill,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Positioning {
    #[default]
    Auto,
    Absolute,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutAlign {
    Inherit,
    Stretch,
    Min,
    Center,
    Max,
    #[serde(other)]
    Unknown,
}

/// Horizontal (LEFT/RIGHT/LEFT_RIGHT) and vertical (TOP/BOTTOM/TOP_BOTTOM)
/// constraints folded onto one axis-neutral enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Constraint {
    #[default]
    #[serde(rename = "MIN", alias = "LEFT", alias = "TOP")]
    Min,
    #[serde(rename = "MAX", alias = "RIGHT", alias = "BOTTOM")]
    Max,
    #[serde(rename = "CENTER")]
    Center,
    #[serde(rename = "STRETCH", alias = "LEFT_RIGHT", alias = "TOP_BOTTOM")]
    Stretch,
    #[serde(rename = "SCALE")]
    Scale,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default)]
    pub horizontal: Constraint,
    #[serde(default)]
    pub vertical: Constraint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendMode {
    #[default]
    PassThrough,
    Normal,
    Darken,
    Multiply,
    LinearBurn,
    ColorBurn,
    Lighten,
    Screen,
    LinearDodge,
    ColorDodge,
    Overlay,
    SoftLight,
    HardLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    #[serde(other)]
    Unknown,
}

impl BlendMode {
    /// `mix-blend-mode` keyword; `None` when the mode is the CSS default.
    pub fn css_value(self) -> Option<&'static str> {
        match self {
            BlendMode::PassThrough | BlendMode::Normal | BlendMode::Unknown => None,
            BlendMode::Darken => Some("darken"),
            BlendMode::Multiply => Some("multiply"),
            BlendMode::LinearBurn | BlendMode::ColorBurn => Some("color-burn"),
            BlendMode::Lighten => Some("lighten"),
            BlendMode::Screen => Some("screen"),
            BlendMode::LinearDodge | BlendMode::ColorDodge => Some("color-dodge"),
            BlendMode::Overlay => Some("overlay"),
            BlendMode::SoftLight => Some("soft-light"),
            BlendMode::HardLight => Some("hard-light"),
            BlendMode::Difference => Some("difference"),
            BlendMode::Exclusion => Some("exclusion"),
            BlendMode::Hue => Some("hue"),
            BlendMode::Saturation => Some("saturation"),
            BlendMode::Color => Some("color"),
            BlendMode::Luminosity => Some("luminosity"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignHorizontal {
    Left,
    Center,
    Right,
    Justified,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignVertical {
    Top,
    Center,
    Bottom,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextCase {
    Original,
    Upper,
    Lower,
    Title,
    SmallCaps,
    SmallCapsForced,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextDecoration {
    None,
    Underline,
    Strikethrough,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineHeightUnit {
    #[serde(rename = "PIXELS")]
    Pixels,
    #[serde(rename = "FONT_SIZE_%")]
    FontSizePercent,
    #[serde(rename = "INTRINSIC_%")]
    IntrinsicPercent,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrokeAlign {
    Inside,
    Outside,
    Center,
    #[serde(other)]
    Unknown,
}

/// Text style (`style` on TEXT nodes).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeStyle {
    pub font_family: Option<String>,
    pub font_post_script_name: Option<String>,
    pub font_style: Option<String>,
    pub font_weight: Option<f64>,
    pub font_size: Option<f64>,
    pub italic: bool,
    pub line_height_px: Option<f64>,
    pub line_height_percent_font_size: Option<f64>,
    pub line_height_unit: Option<LineHeightUnit>,
    pub letter_spacing: f64,
    pub text_align_horizontal: Option<TextAlignHorizontal>,
    pub text_align_vertical: Option<TextAlignVertical>,
    pub text_case: Option<TextCase>,
    pub text_decoration: Option<TextDecoration>,
    pub paragraph_indent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GridTracks {
    pub columns: u32,
    pub rows: u32,
    pub column_gap: f64,
    pub row_gap: f64,
    pub columns_sizing: Option<String>,
    pub rows_sizing: Option<String>,
}

/// Auto-layout metadata of a frame-like container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AutoLayout {
    pub mode: LayoutMode,
    pub item_spacing: f64,
    pub counter_axis_spacing: Option<f64>,
    pub padding: Padding,
    pub primary_align: AxisAlign,
    pub counter_align: AxisAlign,
    pub wrap: LayoutWrap,
    pub reverse_z_index: bool,
    pub grid: Option<GridTracks>,
}

/// How a node sits inside its parent's layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutChild {
    pub positioning: Positioning,
    pub sizing_horizontal: Option<Sizing>,
    pub sizing_vertical: Option<Sizing>,
    pub grow: f64,
    pub align: Option<LayoutAlign>,
    pub grid_column_span: Option<u32>,
    pub grid_row_span: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeLimits {
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StrokeWeights {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
}

/// Fill and stroke layers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaintStyle {
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weight: Option<f64>,
    pub individual_stroke_weights: Option<StrokeWeights>,
    pub stroke_align: Option<StrokeAlign>,
    pub stroke_dashes: Vec<f64>,
}

impl PaintStyle {
    pub fn visible_fills(&self) -> impl Iterator<Item = &Paint> {
        self.fills.iter().filter(|p| p.visible)
    }

    pub fn visible_strokes(&self) -> impl Iterator<Item = &Paint> {
        self.strokes.iter().filter(|p| p.visible)
    }
}

/// Uniform radius and optional per-corner radii (tl, tr, br, bl).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CornerRadii {
    pub uniform: Option<f64>,
    pub per_corner: Option<[f64; 4]>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VectorGeometry {
    pub fill_geometry: Vec<GeometryPath>,
    pub stroke_geometry: Vec<GeometryPath>,
}

/// A `boundVariables` entry: one alias, a list (paints) or anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundVariable {
    Alias(VariableAlias),
    List(Vec<VariableAlias>),
    Other(Value),
}

impl BoundVariable {
    pub fn first_id(&self) -> Option<&str> {
        match self {
            BoundVariable::Alias(alias) => Some(alias.id.as_str()),
            BoundVariable::List(list) => list.first().map(|a| a.id.as_str()),
            BoundVariable::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentProperty {
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerData {
    pub layout: AutoLayout,
    pub paints: PaintStyle,
    pub corners: CornerRadii,
    pub clips_content: bool,
    pub children: Vec<DesignNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupData {
    pub children: Vec<DesignNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextData {
    pub characters: String,
    pub style: TypeStyle,
    pub paints: PaintStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeData {
    pub paints: PaintStyle,
    pub corners: CornerRadii,
    pub geometry: VectorGeometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorData {
    pub paints: PaintStyle,
    pub geometry: VectorGeometry,
    pub children: Vec<DesignNode>,
}

/// Per-kind payload of a [`DesignNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// FRAME, COMPONENT, COMPONENT_SET, INSTANCE, SECTION
    Container(ContainerData),
    /// GROUP
    Group(GroupData),
    /// TEXT
    Text(TextData),
    /// RECTANGLE, ELLIPSE, POLYGON, STAR, REGULAR_POLYGON
    Shape(ShapeData),
    /// VECTOR, BOOLEAN_OPERATION, LINE
    Vector(VectorData),
    /// Unrecognized type string; rendered as a generic container.
    Other(ContainerData),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignNode {
    pub id: String,
    pub name: String,
    pub node_type: NodeType,
    /// `type` exactly as received.
    pub type_name: String,
    pub visible: bool,
    pub bounds: Option<Rect>,
    pub size: Option<Vector2>,
    pub relative_transform: Option<[[f64; 3]; 2]>,
    /// Radians, design-tool convention (counter-clockwise positive).
    pub rotation: f64,
    pub opacity: f64,
    pub blend_mode: BlendMode,
    pub constraints: Option<Constraints>,
    pub layout_child: LayoutChild,
    pub size_limits: SizeLimits,
    pub effects: Vec<Effect>,
    pub is_mask: bool,
    pub preserve_ratio: bool,
    pub has_export_settings: bool,
    pub bound_variables: IndexMap<String, BoundVariable>,
    pub component_properties: IndexMap<String, ComponentProperty>,
    pub component_property_references: IndexMap<String, String>,
    pub kind: NodeKind,
    attributes: Map<String, Value>,
}

impl DesignNode {
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(de::Error::custom("design node must be a JSON object"));
        };

        let children = match map.remove("children") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(DesignNode::from_value)
                .collect::<serde_json::Result<Vec<_>>>()?,
            _ => Vec::new(),
        };

        let raw: RawNode = serde_json::from_value(Value::Object(map.clone()))?;
        let attributes = flatten_style(map);
        Ok(raw.into_node(attributes, children))
    }

    pub fn children(&self) -> &[DesignNode] {
        match &self.kind {
            NodeKind::Container(c) | NodeKind::Other(c) => &c.children,
            NodeKind::Group(g) => &g.children,
            NodeKind::Vector(v) => &v.children,
            NodeKind::Text(_) | NodeKind::Shape(_) => &[],
        }
    }

    pub fn paints(&self) -> Option<&PaintStyle> {
        match &self.kind {
            NodeKind::Container(c) | NodeKind::Other(c) => Some(&c.paints),
            NodeKind::Text(t) => Some(&t.paints),
            NodeKind::Shape(s) => Some(&s.paints),
            NodeKind::Vector(v) => Some(&v.paints),
            NodeKind::Group(_) => None,
        }
    }

    pub fn fills(&self) -> &[Paint] {
        self.paints().map(|p| p.fills.as_slice()).unwrap_or(&[])
    }

    pub fn auto_layout(&self) -> Option<&AutoLayout> {
        match &self.kind {
            NodeKind::Container(c) | NodeKind::Other(c) => Some(&c.layout),
            _ => None,
        }
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.auto_layout().map(|l| l.mode).unwrap_or_default()
    }

    pub fn corners(&self) -> Option<&CornerRadii> {
        match &self.kind {
            NodeKind::Container(c) | NodeKind::Other(c) => Some(&c.corners),
            NodeKind::Shape(s) => Some(&s.corners),
            _ => None,
        }
    }

    pub fn vector_geometry(&self) -> Option<&VectorGeometry> {
        match &self.kind {
            NodeKind::Shape(s) => Some(&s.geometry),
            NodeKind::Vector(v) => Some(&v.geometry),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&TextData> {
        match &self.kind {
            NodeKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn clips_content(&self) -> bool {
        match &self.kind {
            NodeKind::Container(c) | NodeKind::Other(c) => c.clips_content,
            _ => false,
        }
    }

    /// Bounding box, zero-sized when the source had none.
    pub fn bounds_or_zero(&self) -> Rect {
        self.bounds.unwrap_or_default()
    }

    pub fn width(&self) -> f64 {
        self.size
            .map(|s| s.x)
            .or(self.bounds.map(|b| b.width))
            .unwrap_or(0.0)
    }

    pub fn height(&self) -> f64 {
        self.size
            .map(|s| s.y)
            .or(self.bounds.map(|b| b.height))
            .unwrap_or(0.0)
    }

    /// Own rotation in CSS degrees (clockwise positive).
    pub fn rotation_degrees(&self) -> f64 {
        if self.rotation == 0.0 {
            0.0
        } else {
            -self.rotation * 180.0 / PI
        }
    }

    pub fn is_absolute(&self) -> bool {
        self.layout_child.positioning == Positioning::Absolute
    }

    pub fn has_image_fill(&self) -> bool {
        self.fills().iter().any(|p| p.visible && p.is_image())
    }

    /// Raw attribute for rule selectors (`style` keys flattened to the top level).
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn bound_variable_id(&self, property: &str) -> Option<&str> {
        self.bound_variables.get(property).and_then(|b| b.first_id())
    }
}

impl<'de> Deserialize<'de> for DesignNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        DesignNode::from_value(value).map_err(de::Error::custom)
    }
}

fn flatten_style(mut map: Map<String, Value>) -> Map<String, Value> {
    if let Some(Value::Object(style)) = map.get("style").cloned() {
        for (key, value) in style {
            map.entry(key).or_insert(value);
        }
    }
    map
}

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    #[serde(default, deserialize_with = "lenient::or_default")]
    id: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::or_default")]
    node_type: String,
    #[serde(default = "default_true", deserialize_with = "lenient::flag_true")]
    visible: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    absolute_bounding_box: Option<Rect>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    size: Option<Vector2>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    relative_transform: Option<[[f64; 3]; 2]>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    rotation: Option<f64>,
    #[serde(default = "default_one", deserialize_with = "lenient::unit_factor")]
    opacity: f64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    blend_mode: BlendMode,
    #[serde(default, deserialize_with = "lenient::or_default")]
    constraints: Option<Constraints>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    is_mask: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    preserve_ratio: bool,
    #[serde(default, deserialize_with = "lenient::list")]
    export_settings: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::list")]
    effects: Vec<Effect>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    bound_variables: IndexMap<String, BoundVariable>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    component_properties: IndexMap<String, ComponentProperty>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    component_property_references: IndexMap<String, String>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    layout_positioning: Positioning,
    #[serde(default, deserialize_with = "lenient::or_default")]
    layout_sizing_horizontal: Option<Sizing>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    layout_sizing_vertical: Option<Sizing>,
    #[serde(default, deserialize_with = "lenient::number")]
    layout_grow: f64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    layout_align: Option<LayoutAlign>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    grid_column_span: Option<u32>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    grid_row_span: Option<u32>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    min_width: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    max_width: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    min_height: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    max_height: Option<f64>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    layout_mode: LayoutMode,
    #[serde(default, deserialize_with = "lenient::number")]
    item_spacing: f64,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    counter_axis_spacing: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    padding_top: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    padding_right: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    padding_bottom: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    padding_left: f64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    primary_axis_align_items: AxisAlign,
    #[serde(default, deserialize_with = "lenient::or_default")]
    counter_axis_align_items: AxisAlign,
    #[serde(default, deserialize_with = "lenient::or_default")]
    layout_wrap: LayoutWrap,
    #[serde(default, deserialize_with = "lenient::or_default")]
    item_reverse_z_index: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    grid_column_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    grid_row_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient::number")]
    grid_column_gap: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    grid_row_gap: f64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    grid_columns_sizing: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    grid_rows_sizing: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    clips_content: bool,

    #[serde(default, deserialize_with = "lenient::list")]
    fills: Vec<Paint>,
    #[serde(default, deserialize_with = "lenient::list")]
    strokes: Vec<Paint>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    stroke_weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    individual_stroke_weights: Option<StrokeWeights>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    stroke_align: Option<StrokeAlign>,
    #[serde(default, deserialize_with = "lenient::list")]
    stroke_dashes: Vec<f64>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    corner_radius: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    rectangle_corner_radii: Option<[f64; 4]>,
    #[serde(default, deserialize_with = "lenient::list")]
    fill_geometry: Vec<GeometryPath>,
    #[serde(default, deserialize_with = "lenient::list")]
    stroke_geometry: Vec<GeometryPath>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    characters: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    style: TypeStyle,
}

impl RawNode {
    fn into_node(self, attributes: Map<String, Value>, children: Vec<DesignNode>) -> DesignNode {
        let node_type = NodeType::parse(&self.node_type);

        let paints = PaintStyle {
            fills: self.fills,
            strokes: self.strokes,
            stroke_weight: self.stroke_weight,
            individual_stroke_weights: self.individual_stroke_weights,
            stroke_align: self.stroke_align,
            stroke_dashes: self.stroke_dashes,
        };
        let corners = CornerRadii {
            uniform: self.corner_radius,
            per_corner: self.rectangle_corner_radii,
        };
        let geometry = VectorGeometry {
            fill_geometry: self.fill_geometry,
            stroke_geometry: self.stroke_geometry,
        };
        let grid = (self.layout_mode == LayoutMode::Grid).then(|| GridTracks {
            columns: self.grid_column_count.unwrap_or(0),
            rows: self.grid_row_count.unwrap_or(0),
            column_gap: self.grid_column_gap,
            row_gap: self.grid_row_gap,
            columns_sizing: self.grid_columns_sizing,
            rows_sizing: self.grid_rows_sizing,
        });
        let layout = AutoLayout {
            mode: self.layout_mode,
            item_spacing: self.item_spacing,
            counter_axis_spacing: self.counter_axis_spacing,
            padding: Padding {
                top: self.padding_top,
                right: self.padding_right,
                bottom: self.padding_bottom,
                left: self.padding_left,
            },
            primary_align: self.primary_axis_align_items,
            counter_align: self.counter_axis_align_items,
            wrap: self.layout_wrap,
            reverse_z_index: self.item_reverse_z_index,
            grid,
        };

        let kind = match node_type {
            NodeType::Frame
            | NodeType::Section
            | NodeType::Component
            | NodeType::ComponentSet
            | NodeType::Instance => NodeKind::Container(ContainerData {
                layout,
                paints,
                corners,
                clips_content: self.clips_content,
                children,
            }),
            NodeType::Group => NodeKind::Group(GroupData { children }),
            NodeType::Text => NodeKind::Text(TextData {
                characters: self.characters,
                style: self.style,
                paints,
            }),
            NodeType::Rectangle
            | NodeType::Ellipse
            | NodeType::Polygon
            | NodeType::Star
            | NodeType::RegularPolygon => NodeKind::Shape(ShapeData {
                paints,
                corners,
                geometry,
            }),
            NodeType::Vector | NodeType::BooleanOperation | NodeType::Line => {
                NodeKind::Vector(VectorData {
                    paints,
                    geometry,
                    children,
                })
            }
            NodeType::Other => NodeKind::Other(ContainerData {
                layout,
                paints,
                corners,
                clips_content: self.clips_content,
                children,
            }),
        };

        DesignNode {
            id: self.id,
            name: self.name,
            node_type,
            type_name: self.node_type,
            visible: self.visible,
            bounds: self.absolute_bounding_box,
            size: self.size,
            relative_transform: self.relative_transform,
            rotation: self.rotation.unwrap_or(0.0),
            opacity: self.opacity,
            blend_mode: self.blend_mode,
            constraints: self.constraints,
            layout_child: LayoutChild {
                positioning: self.layout_positioning,
                sizing_horizontal: self.layout_sizing_horizontal,
                sizing_vertical: self.layout_sizing_vertical,
                grow: self.layout_grow,
                align: self.layout_align,
                grid_column_span: self.grid_column_span,
                grid_row_span: self.grid_row_span,
            },
            size_limits: SizeLimits {
                min_width: self.min_width,
                max_width: self.max_width,
                min_height: self.min_height,
                max_height: self.max_height,
            },
            effects: self.effects,
            is_mask: self.is_mask,
            preserve_ratio: self.preserve_ratio,
            has_export_settings: !self.export_settings.is_empty(),
            bound_variables: self.bound_variables,
            component_properties: self.component_properties,
            component_property_references: self.component_property_references,
            kind,
            attributes,
        }
    }
}
