//! React + Tailwind component generation.
//!
//! The v4 target is the v3 renderer with every class list migrated before
//! it is written out.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::alt_node::{format_number, AltNode, FillLayer, FillLayerKind, FlexDirection, NegativeSpacing};
use crate::figma::node::HtmlTag;

use super::assets::{placeholder_image_url, ResolvedAssets};
use super::helpers::{
    data_attribute_string, escape_attribute, text_content, unique_identifier, visibility_classes,
};
use super::tailwind::{css_prop_to_tailwind, finalize, split_classes, style_classes, v4};
use super::{is_rendered, node_styles, svg, AssetKind, GenerateRequest, GeneratedAsset, NodeStyles, Rendered, SvgMode};

/// Style keys carried over onto an SVG `<img>`.
const SVG_PLACEMENT_KEYS: [&str; 11] = [
    "position",
    "top",
    "left",
    "right",
    "bottom",
    "grid-area",
    "margin-left",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "opacity",
];

/// Keys replaced by `<img>` or fill layers when a node renders its image itself.
const IMAGE_BACKGROUND_KEYS: [&str; 2] = ["background-image", "background-size"];

/// Texts this short (initials, bullets) stay hardcoded.
const MIN_TEXT_PROP_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropKind {
    Text,
    Image,
}

#[derive(Debug, Clone)]
struct PropBinding {
    name: String,
    kind: PropKind,
    default: String,
}

#[derive(Debug, Clone)]
enum SvgSource {
    DataUrl(String),
    Import(String),
}

/// How a node with fills is emitted.
enum FillMode<'n> {
    None,
    Layered,
    Image(&'n FillLayer),
}

pub(super) fn render(
    request: &GenerateRequest<'_, '_>,
    assets: &ResolvedAssets,
    component_name: &str,
    v4: bool,
) -> Rendered {
    let mut renderer = ReactRenderer {
        request,
        assets,
        v4,
        props: IndexMap::new(),
        svgs: HashMap::new(),
        exports: Vec::new(),
        warnings: Vec::new(),
    };
    renderer.prepare_svgs(request.root);
    if request.options.with_props {
        let mut used = HashSet::new();
        renderer.collect_props(request.root, &mut used);
    }

    let mut jsx = String::new();
    renderer.element(request.root, 0, None, &mut jsx);

    let code = renderer.wrap(component_name, &jsx);
    Rendered {
        code,
        css: None,
        assets: renderer.exports.iter().map(|(_, asset)| asset.clone()).collect(),
        warnings: renderer.warnings,
    }
}

fn svg_size(node: &AltNode<'_>) -> (f64, f64) {
    match &node.svg {
        Some(data) => (data.width, data.height),
        None => {
            let bounds = node.source.bounds_or_zero();
            (bounds.width, bounds.height)
        }
    }
}

fn has_image_fill(node: &AltNode<'_>) -> bool {
    node.fills.iter().any(|layer| layer.image_ref().is_some())
}

fn fill_mode<'n>(node: &'n AltNode<'_>) -> FillMode<'n> {
    let has_children = !node.children.is_empty();
    if node.fills.len() > 1 || (has_image_fill(node) && has_children) {
        return FillMode::Layered;
    }
    match node.fills.first() {
        Some(layer) if layer.image_ref().is_some() && !has_children => FillMode::Image(layer),
        _ => FillMode::None,
    }
}

/// Escape a default value for a double-quoted JS string.
fn js_string(value: &str) -> String {
    value
        .replace(['\u{2028}', '\u{2029}'], "\n")
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("\r\n", "\\n")
        .replace('\r', "\\n")
        .replace('\n', "\\n")
}

struct ReactRenderer<'r, 'a, 'src> {
    request: &'r GenerateRequest<'a, 'src>,
    assets: &'r ResolvedAssets,
    v4: bool,
    /// Prop bindings keyed by node id.
    props: IndexMap<String, PropBinding>,
    svgs: HashMap<String, SvgSource>,
    /// Exported SVG files with the variable each is imported as.
    exports: Vec<(String, GeneratedAsset)>,
    warnings: Vec<String>,
}

impl<'r, 'a, 'src> ReactRenderer<'r, 'a, 'src> {
    fn indent(depth: usize) -> String {
        "  ".repeat(depth + 3)
    }

    /// Run the class clean-up and, for v4, the syntax migration.
    fn class_list(&self, classes: Vec<String>) -> String {
        let classes = finalize(classes, self.request.options.spacing_tolerance);
        let classes = if self.v4 { v4::migrate(classes) } else { classes };
        classes.join(" ")
    }

    fn class_attr(classes: &str) -> String {
        if classes.is_empty() {
            String::new()
        } else {
            format!(" className=\"{}\"", classes)
        }
    }

    fn svg_document(&mut self, node: &AltNode<'_>) -> String {
        if let Some(exported) = self.assets.svg(&node.id) {
            return exported.to_string();
        }
        if let Some(data) = &node.svg {
            return svg::reconstruct(data);
        }
        let (width, height) = svg_size(node);
        self.warnings
            .push(format!("SVG for node {} unavailable; placeholder used", node.id));
        svg::placeholder(width, height)
    }

    /// Decide every SVG node's `src` up front so imports can be emitted
    /// before the component body.
    fn prepare_svgs(&mut self, root: &AltNode<'_>) {
        let mut used = HashSet::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if !is_rendered(node) {
                continue;
            }
            if !svg::is_svg_node(node) {
                stack.extend(node.children.iter().rev());
                continue;
            }
            let document = self.svg_document(node);
            let source = match self.request.options.svg_mode {
                SvgMode::Inline => SvgSource::DataUrl(svg::data_url(&document)),
                SvgMode::Export => {
                    let var_name = svg::variable_name(&node.name, &mut used);
                    let filename = format!("{}.svg", var_name);
                    self.exports.push((
                        var_name.clone(),
                        GeneratedAsset {
                            path: format!("./img/{}", filename),
                            filename,
                            content: document,
                            kind: AssetKind::Svg,
                        },
                    ));
                    SvgSource::Import(var_name)
                }
            };
            self.svgs.insert(node.id.clone(), source);
        }
    }

    fn collect_props(&mut self, node: &AltNode<'_>, used: &mut HashSet<String>) {
        if !node.visible || svg::is_svg_node(node) {
            return;
        }
        if node.is_text() {
            if let Some(text) = node.characters() {
                if text.trim().chars().count() >= MIN_TEXT_PROP_LEN {
                    self.bind(node, PropKind::Text, text.to_string(), used);
                }
            }
        }
        if let FillMode::Image(layer) = fill_mode(node) {
            let url = layer
                .image_ref()
                .and_then(|r| self.assets.image_url(r))
                .map(str::to_string);
            if let Some(url) = url {
                self.bind(node, PropKind::Image, url, used);
            }
        }
        for child in &node.children {
            self.collect_props(child, used);
        }
    }

    fn bind(&mut self, node: &AltNode<'_>, kind: PropKind, default: String, used: &mut HashSet<String>) {
        let name = unique_identifier(&node.name, used);
        self.props.insert(node.id.clone(), PropBinding { name, kind, default });
    }

    fn prop_for(&self, node: &AltNode<'_>, kind: PropKind) -> Option<&str> {
        self.props
            .get(&node.id)
            .filter(|binding| binding.kind == kind)
            .map(|binding| binding.name.as_str())
    }

    fn image_url(&self, node: &AltNode<'_>, image_ref: &str) -> String {
        match self.assets.image_url(image_ref) {
            Some(url) => url.to_string(),
            None => {
                let (width, height) = svg_size(node);
                placeholder_image_url(width, height)
            }
        }
    }

    fn element(
        &mut self,
        node: &AltNode<'_>,
        depth: usize,
        spacing: Option<(NegativeSpacing, bool)>,
        out: &mut String,
    ) {
        if !is_rendered(node) {
            return;
        }
        if svg::is_svg_node(node) {
            self.svg_element(node, depth, out);
            return;
        }

        let indent = Self::indent(depth);
        let tag = match node.tag {
            HtmlTag::Svg => "div",
            tag => tag.as_str(),
        };
        let data = data_attribute_string(node);
        let mode = fill_mode(node);
        let mut styles = node_styles(self.request, node);
        if !matches!(mode, FillMode::None) {
            for key in IMAGE_BACKGROUND_KEYS {
                styles.styles.remove(key);
            }
        }
        let mut classes = self.element_classes(node, &styles, spacing);

        if node.is_text() {
            let content = match self.prop_for(node, PropKind::Text) {
                Some(prop) => format!("{{{}}}", prop),
                None => node.characters().map(text_content).unwrap_or_default(),
            };
            out.push_str(&format!(
                "{indent}<{tag} {data}{class}>{content}</{tag}>\n",
                class = Self::class_attr(&self.class_list(classes)),
            ));
            return;
        }

        if let FillMode::Image(layer) = mode {
            if let FillLayerKind::Image { image_ref, scale_mode } = &layer.kind {
                classes.push(format!("object-{}", scale_mode.object_fit()));
                let src = match self.prop_for(node, PropKind::Image) {
                    Some(prop) => format!("{{{}}}", prop),
                    None => format!("\"{}\"", escape_attribute(&self.image_url(node, image_ref))),
                };
                out.push_str(&format!(
                    "{indent}<img {data}{class} alt=\"{alt}\" src={src} />\n",
                    class = Self::class_attr(&self.class_list(classes)),
                    alt = escape_attribute(if node.name.is_empty() { "image" } else { node.name.as_str() }),
                ));
                return;
            }
        }

        let class = Self::class_attr(&self.class_list(classes));
        let style = self.mask_style(node);
        let layered = matches!(mode, FillMode::Layered);
        if node.children.is_empty() && !layered {
            out.push_str(&format!("{indent}<{tag} {data}{class}{style} />\n"));
            return;
        }

        out.push_str(&format!("{indent}<{tag} {data}{class}{style}>\n"));
        if layered {
            self.fill_layers(node, depth + 1, out);
        }
        self.children(node, depth + 1, out);
        out.push_str(&format!("{indent}</{tag}>\n"));
    }

    fn children(&mut self, node: &AltNode<'_>, depth: usize, out: &mut String) {
        let count = node.children.len();
        for (index, child) in node.children.iter().enumerate() {
            let spacing = node.negative_spacing.map(|s| (s, index + 1 == count));
            self.element(child, depth, spacing, out);
        }
    }

    fn element_classes(
        &self,
        node: &AltNode<'_>,
        styles: &NodeStyles,
        spacing: Option<(NegativeSpacing, bool)>,
    ) -> Vec<String> {
        let merged = &styles.styles;
        let is_flex_container = merged.is("display", "flex") || merged.is("display", "inline-flex");

        let mut classes: Vec<String> = vec!["box-border".to_string()];
        if !node.is_text() && !node.is_absolute() && !merged.contains_key("grid-area") {
            classes.push("relative".to_string());
        }
        classes.push("shrink-0".to_string());
        if let Some((spacing, false)) = spacing {
            let side = match spacing.direction {
                FlexDirection::Row => "mr",
                FlexDirection::Column => "mb",
            };
            classes.push(format!("{}-[{}px]", side, format_number(spacing.value)));
        }
        let has_vector_children = node.children.iter().any(|child| child.svg.is_some());
        let fixed_size = merged.contains_key("width") && merged.contains_key("height");
        let display = merged.get_string("display").unwrap_or_default();
        if has_vector_children && fixed_size && !display.contains("flex") {
            classes.extend(["flex", "items-center", "justify-center"].map(String::from));
        }

        classes.extend(style_classes(merged));

        let responsive = self.responsive_classes(node);
        classes.extend(responsive.iter().cloned());

        // Visibility comes after the base display class so `hidden` wins
        // below the first breakpoint.
        if let Some(presence) = &node.presence {
            for class in visibility_classes(presence) {
                let class = if is_flex_container {
                    class.replace(":block", ":flex")
                } else {
                    class.to_string()
                };
                classes.push(class);
            }
        }

        if let Some(rule_classes) = &styles.rule_classes {
            let grow_reset = responsive.iter().any(|c| c.ends_with(":grow-0"));
            classes.extend(
                split_classes(rule_classes)
                    .into_iter()
                    .filter(|c| !(grow_reset && matches!(c.as_str(), "grow" | "basis-0" | "flex-grow"))),
            );
        }
        classes
    }

    fn responsive_classes(&self, node: &AltNode<'_>) -> Vec<String> {
        let Some(responsive) = &node.responsive else {
            return Vec::new();
        };
        let mut classes = Vec::new();
        for (prefix, styles) in [("md", &responsive.md), ("lg", &responsive.lg)] {
            let Some(styles) = styles else {
                continue;
            };
            let grows = styles.is("flex-grow", "1");
            for (property, value) in styles.iter() {
                let value = value.to_string();
                if property == "width" && value == "auto" && grows {
                    classes.push(format!("{}:basis-0", prefix));
                    continue;
                }
                for class in split_classes(&css_prop_to_tailwind(property, &value)) {
                    classes.push(format!("{}:{}", prefix, class));
                }
            }
        }
        classes
    }

    fn mask_style(&self, node: &AltNode<'_>) -> String {
        let Some(url) = node
            .mask_image_ref
            .as_deref()
            .and_then(|mask| self.assets.image_url(mask))
        else {
            return String::new();
        };
        let props = [
            ("WebkitMaskImage", format!("url('{}')", url)),
            ("maskImage", format!("url('{}')", url)),
            ("WebkitMaskSize", "contain".to_string()),
            ("maskSize", "contain".to_string()),
            ("WebkitMaskRepeat", "no-repeat".to_string()),
            ("maskRepeat", "no-repeat".to_string()),
            ("WebkitMaskPosition", "center".to_string()),
            ("maskPosition", "center".to_string()),
        ];
        let body = props
            .iter()
            .map(|(key, value)| format!("{}: \"{}\"", key, value))
            .collect::<Vec<_>>()
            .join(", ");
        format!(" style={{{{ {} }}}}", body)
    }

    /// Every fill as an absolutely positioned, decorative layer.
    fn fill_layers(&self, node: &AltNode<'_>, depth: usize, out: &mut String) {
        let indent = Self::indent(depth);
        let rounded = node
            .styles
            .get_string("border-radius")
            .is_some_and(|r| r != "0px" && r != "0");
        let (wrapper_extra, layer_extra) = if rounded {
            (" overflow-hidden rounded-[inherit]", " rounded-[inherit]")
        } else {
            ("", "")
        };
        out.push_str(&format!(
            "{indent}<div aria-hidden=\"true\" className=\"absolute inset-0 pointer-events-none{wrapper_extra}\">\n"
        ));
        let inner = Self::indent(depth + 1);
        for layer in &node.fills {
            match &layer.kind {
                FillLayerKind::Image { image_ref, scale_mode } => {
                    out.push_str(&format!(
                        "{inner}<img alt=\"\" className=\"absolute inset-0 w-full h-full object-{fit}{layer_extra}\" src=\"{src}\" />\n",
                        fit = scale_mode.object_fit(),
                        src = escape_attribute(&self.image_url(node, image_ref)),
                    ));
                }
                FillLayerKind::Solid { color } => {
                    out.push_str(&format!(
                        "{inner}<div className=\"absolute inset-0{layer_extra}\" style={{{{ backgroundColor: \"{}\" }}}} />\n",
                        color.to_css_rgba(color.a * layer.opacity),
                    ));
                }
                FillLayerKind::Gradient { css } => {
                    out.push_str(&format!(
                        "{inner}<div className=\"absolute inset-0{layer_extra}\" style={{{{ backgroundImage: \"{}\" }}}} />\n",
                        css,
                    ));
                }
            }
        }
        out.push_str(&format!("{indent}</div>\n"));
    }

    fn svg_element(&self, node: &AltNode<'_>, depth: usize, out: &mut String) {
        let indent = Self::indent(depth);
        let styles = node_styles(self.request, node).styles;
        let (width, height) = svg_size(node);

        let mut classes = vec!["block".to_string(), "max-w-none".to_string()];
        for (property, prefix, size) in [("width", "w", width), ("height", "h", height)] {
            match styles.get_string(property) {
                Some(value) if value.contains('%') => {
                    classes.extend(split_classes(&css_prop_to_tailwind(property, &value)));
                }
                _ if size > 0.0 => classes.push(format!("{}-[{}px]", prefix, size.round())),
                _ => {}
            }
        }
        for key in SVG_PLACEMENT_KEYS {
            if let Some(value) = styles.get_string(key) {
                classes.extend(split_classes(&css_prop_to_tailwind(key, &value)));
            }
        }
        if let Some(presence) = &node.presence {
            classes.extend(visibility_classes(presence).iter().map(|c| c.to_string()));
        }

        let src = match self.svgs.get(&node.id) {
            Some(SvgSource::Import(var_name)) => format!("{{{}}}", var_name),
            Some(SvgSource::DataUrl(url)) => format!("\"{}\"", url),
            None => format!("\"{}\"", svg::data_url(&svg::placeholder(width, height))),
        };
        out.push_str(&format!(
            "{indent}<img {data}{class} alt=\"{alt}\" src={src} />\n",
            data = data_attribute_string(node),
            class = Self::class_attr(&self.class_list(classes)),
            alt = escape_attribute(if node.name.is_empty() { "svg" } else { node.name.as_str() }),
        ));
    }

    fn props_interface(&self, component_name: &str) -> String {
        let mut lines = Vec::new();
        for (kind, heading) in [(PropKind::Text, "// Text content"), (PropKind::Image, "// Images")] {
            let names: Vec<&str> = self
                .props
                .values()
                .filter(|p| p.kind == kind)
                .map(|p| p.name.as_str())
                .collect();
            if names.is_empty() {
                continue;
            }
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("  {}", heading));
            lines.extend(names.iter().map(|name| format!("  {}?: string;", name)));
        }
        format!("interface {}Props {{\n{}\n}}\n\n", component_name, lines.join("\n"))
    }

    fn props_destructuring(&self, component_name: &str) -> String {
        let mut lines = Vec::new();
        for (kind, heading) in [(PropKind::Text, "// Text content"), (PropKind::Image, "// Images")] {
            let bindings: Vec<&PropBinding> = self.props.values().filter(|p| p.kind == kind).collect();
            if bindings.is_empty() {
                continue;
            }
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("  {}", heading));
            lines.extend(
                bindings
                    .iter()
                    .map(|p| format!("  {} = \"{}\",", p.name, js_string(&p.default))),
            );
        }
        format!("{{\n{}\n}}: {}Props", lines.join("\n"), component_name)
    }

    fn wrap(&self, component_name: &str, jsx: &str) -> String {
        let imports: Vec<String> = self
            .exports
            .iter()
            .map(|(var_name, asset)| format!("import {} from \"{}\";", var_name, asset.path))
            .collect();
        let import_section = if imports.is_empty() {
            String::new()
        } else {
            format!("{}\n\n", imports.join("\n"))
        };

        let style_tag = self
            .request
            .root_variables()
            .map(|defs| {
                format!(
                    "      <style dangerouslySetInnerHTML={{{{ __html: `{}` }}}} />\n",
                    defs
                )
            })
            .unwrap_or_default();

        let (interface, params) = if self.props.is_empty() {
            (String::new(), String::new())
        } else {
            (
                self.props_interface(component_name),
                self.props_destructuring(component_name),
            )
        };

        format!(
            "{import_section}{interface}export function {component_name}({params}) {{\n  return (\n    <>\n{style_tag}{jsx}    </>\n  );\n}}"
        )
    }
}
